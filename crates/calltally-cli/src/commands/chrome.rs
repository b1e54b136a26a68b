use crate::Context;
use anyhow::Result;
use calltally_browser::{ChromeFinder, ChromeLauncher, ProfileManager};
use std::path::PathBuf;
use std::process::Child;

/// Profile used when none is named
pub const DEFAULT_PROFILE: &str = "default";

/// Chrome started with remote debugging, plus the profile it runs on
pub struct LaunchedChrome {
    pub process: Child,
    pub profile: ProfileManager,
    pub debugging_port: u16,
}

/// Find Chrome and start it with remote debugging on the configured port.
pub fn launch(
    ctx: &Context,
    chrome_path: Option<PathBuf>,
    url: Option<String>,
    profile: Option<&str>,
    temp: bool,
) -> Result<LaunchedChrome> {
    let finder = ChromeFinder::new(chrome_path);
    let chrome_binary = finder.find()?;
    tracing::info!("Found Chrome at: {}", chrome_binary.display());

    let profile = if temp {
        tracing::info!("Using temporary profile");
        ProfileManager::temporary()?
    } else {
        let name = profile.unwrap_or(DEFAULT_PROFILE);
        let profile = ProfileManager::named(name)?;
        tracing::info!("Using profile: {}", profile.path().display());
        profile
    };

    let launcher = ChromeLauncher::new(chrome_binary, profile.path().to_path_buf(), url)
        .with_debugging_port(ctx.settings.debugging_port);
    let process = launcher.launch()?;

    Ok(LaunchedChrome {
        process,
        profile,
        debugging_port: launcher.debugging_port(),
    })
}

pub fn execute(
    ctx: &Context,
    chrome_path: Option<PathBuf>,
    url: Option<String>,
    profile: Option<String>,
    temp: bool,
) -> Result<()> {
    let mut chrome = launch(ctx, chrome_path, url, profile.as_deref(), temp)?;

    println!(
        "Chrome started (pid {}) with remote debugging on port {}",
        chrome.process.id(),
        chrome.debugging_port
    );

    // A temporary profile is removed on drop, so stay until Chrome exits.
    if chrome.profile.is_temporary() {
        println!("Waiting for Chrome to close...");
        let status = chrome.process.wait()?;
        println!("Chrome closed (exit code: {})", status.code().unwrap_or(-1));
    }

    Ok(())
}
