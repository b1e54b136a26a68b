use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Chrome user-data directory used for the debugging-enabled browser.
///
/// Chrome refuses remote debugging on the user's everyday profile, so
/// calltally keeps its own under `~/.calltally/profiles/<name>`.
pub struct ProfileManager {
    path: PathBuf,
    is_temporary: bool,
}

impl ProfileManager {
    /// Create a temporary profile that will be deleted on drop
    pub fn temporary() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let path = temp_dir.keep();

        Ok(Self {
            path,
            is_temporary: true,
        })
    }

    /// Create or use a persistent profile at the given path
    pub fn persistent(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(&path)?;
        }

        Ok(Self {
            path,
            is_temporary: false,
        })
    }

    /// A named persistent profile under [`ProfileManager::profiles_dir`]
    pub fn named(name: &str) -> Result<Self> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(Error::Browser(format!("Invalid profile name: '{}'", name)));
        }
        Self::persistent(Self::profiles_dir()?.join(name))
    }

    /// `~/.calltally/profiles`
    pub fn profiles_dir() -> Result<PathBuf> {
        calltally_core::settings::app_dir()
            .map(|dir| dir.join("profiles"))
            .map_err(|e| Error::Browser(e.to_string()))
    }

    /// Get the profile directory path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if this is a temporary profile
    pub fn is_temporary(&self) -> bool {
        self.is_temporary
    }
}

impl Drop for ProfileManager {
    fn drop(&mut self) {
        if self.is_temporary && self.path.exists() {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}
