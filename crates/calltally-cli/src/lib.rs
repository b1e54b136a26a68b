use anyhow::{Context as _, Result};
use calltally_core::controller::PageLayout;
use calltally_core::names::NameSource;
use calltally_core::session::FileSessionStore;
use calltally_core::settings::Settings;
use clap::ValueEnum;
use std::path::PathBuf;

pub mod commands;
pub mod page_source;
pub mod terminal;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
    Table,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pretty => "pretty",
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
        }
    }
}

/// Global flags that override the settings file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub port: Option<u16>,
    pub names: Option<PathBuf>,
    pub session_file: Option<PathBuf>,
}

/// Settings resolved from the config file and command-line overrides
#[derive(Debug, Clone)]
pub struct Context {
    pub settings: Settings,
    pub settings_path: PathBuf,
    pub format: OutputFormat,
}

impl Context {
    pub fn load(overrides: Overrides, format: OutputFormat) -> Result<Self> {
        let settings_path = match overrides.config {
            Some(path) => path,
            None => Settings::default_path()?,
        };
        let mut settings = Settings::load_or_default(&settings_path)
            .with_context(|| format!("Invalid settings file {}", settings_path.display()))?;

        if let Some(port) = overrides.port {
            settings.debugging_port = port;
        }
        if overrides.names.is_some() {
            settings.names_file = overrides.names;
        }
        if overrides.session_file.is_some() {
            settings.session_file = overrides.session_file;
        }

        Ok(Self {
            settings,
            settings_path,
            format,
        })
    }

    pub fn name_source(&self) -> NameSource {
        NameSource::from_option(self.settings.names_file.clone())
    }

    pub fn session_store(&self) -> Result<FileSessionStore> {
        let path = match &self.settings.session_file {
            Some(path) => path.clone(),
            None => FileSessionStore::default_path()?,
        };
        Ok(FileSessionStore::new(path))
    }

    pub fn layout(&self) -> PageLayout {
        PageLayout {
            master: self.settings.master_locator.clone(),
            table: self.settings.table_locator.clone(),
        }
    }
}

/// Multi-threaded runtime for commands that talk to the browser
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}
