use crate::{Error, Result};
use calltally_core::settings::DEFAULT_DEBUGGING_PORT;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use url::Url;

/// Starts Chrome with remote debugging enabled so calltally can read its tabs
pub struct ChromeLauncher {
    chrome_path: PathBuf,
    profile_path: PathBuf,
    initial_url: Option<String>,
    debugging_port: u16,
}

impl ChromeLauncher {
    pub fn new(chrome_path: PathBuf, profile_path: PathBuf, initial_url: Option<String>) -> Self {
        Self {
            chrome_path,
            profile_path,
            initial_url,
            debugging_port: DEFAULT_DEBUGGING_PORT,
        }
    }

    pub fn with_debugging_port(mut self, port: u16) -> Self {
        self.debugging_port = port;
        self
    }

    /// Launch Chrome process
    pub fn launch(&self) -> Result<Child> {
        let args = self.build_args()?;
        tracing::debug!("Launching {} {}", self.chrome_path.display(), args.join(" "));

        Command::new(&self.chrome_path)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Browser(format!("Failed to launch Chrome: {}", e)))
    }

    fn build_args(&self) -> Result<Vec<String>> {
        let mut args = vec![
            format!("--remote-debugging-port={}", self.debugging_port),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            format!("--user-data-dir={}", self.profile_path.display()),
        ];

        match &self.initial_url {
            Some(url) => args.push(normalize_url(url)?),
            None => args.push("about:blank".to_string()),
        }

        Ok(args)
    }

    pub fn debugging_port(&self) -> u16 {
        self.debugging_port
    }
}

/// Add `https://` to bare hosts and reject anything that still is not a URL
pub fn normalize_url(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    Url::parse(&candidate)
        .map(String::from)
        .map_err(|e| Error::Browser(format!("Invalid URL '{}': {}", raw, e)))
}
