use crate::locator::Locator;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub const DEFAULT_MASTER_LOCATOR: &str = "/html/body/div[2]/div/div/div[7]/div/div/div[2]/b[7]";
pub const DEFAULT_TABLE_LOCATOR: &str = "/html/body/div[2]/div/div/table[2]";
pub const DEFAULT_DEBUGGING_PORT: u16 = 9222;

/// `~/.calltally`
pub fn app_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".calltally"))
        .ok_or_else(|| Error::Io(std::io::Error::other("could not determine home directory")))
}

/// Size and placement of the popup window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowGeometry {
    pub width: u32,
    pub height: u32,
    /// Distance of the window's left edge from the right screen edge
    pub right_offset: u32,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
            right_offset: 450,
        }
    }
}

impl WindowGeometry {
    pub fn left_for_screen(&self, screen_width: u32) -> u32 {
        screen_width.saturating_sub(self.right_offset)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub master_locator: Locator,
    pub table_locator: Locator,
    pub names_file: Option<PathBuf>,
    pub session_file: Option<PathBuf>,
    pub debugging_port: u16,
    pub window: WindowGeometry,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_locator: Locator::parse(DEFAULT_MASTER_LOCATOR)
                .expect("default master locator is valid"),
            table_locator: Locator::parse(DEFAULT_TABLE_LOCATOR)
                .expect("default table locator is valid"),
            names_file: None,
            session_file: None,
            debugging_port: DEFAULT_DEBUGGING_PORT,
            window: WindowGeometry::default(),
        }
    }
}

impl Settings {
    /// `~/.calltally/config.json`
    pub fn default_path() -> Result<PathBuf> {
        Ok(app_dir()?.join("config.json"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Reading settings from: {}", path.display());

        let file = File::open(path)?;
        let settings: Settings = serde_json::from_reader(BufReader::new(file))?;
        Ok(settings)
    }

    /// Settings at `path`, or defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No settings at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::info!("Wrote settings to {}", path.display());
        Ok(())
    }
}
