use crate::Result;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Displayed in place of a full name when the lookup misses.
pub const NOT_FOUND: &str = "не найден";

const BUNDLED_MASTERS: &str = include_str!("../assets/masters.json");

/// Where the surname table comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameSource {
    /// The table compiled into the binary
    Bundled,
    /// A JSON object on disk
    File(PathBuf),
}

impl NameSource {
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map(NameSource::File).unwrap_or(NameSource::Bundled)
    }
}

/// Surname -> full name lookup table. Immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct NameMap {
    entries: HashMap<String, String>,
}

impl NameMap {
    pub fn load(source: &NameSource) -> Result<Self> {
        match source {
            NameSource::Bundled => Self::from_str(BUNDLED_MASTERS),
            NameSource::File(path) => Self::from_file(path),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Reading name table from: {}", path.display());

        let file = File::open(path)?;
        let entries: HashMap<String, String> = serde_json::from_reader(BufReader::new(file))?;

        tracing::info!("Loaded {} names from {}", entries.len(), path.display());
        Ok(Self { entries })
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let entries: HashMap<String, String> = serde_json::from_str(content)?;
        tracing::debug!("Parsed name table with {} entries", entries.len());
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, surname: &str) -> Option<&str> {
        self.entries.get(surname).map(String::as_str)
    }

    /// Resolve a short name like "Ivanov I.I." by its first token.
    ///
    /// This is a heuristic: the host page is assumed to print the surname
    /// first. Anything that misses yields [`NOT_FOUND`].
    pub fn resolve(&self, short_name: Option<&str>) -> &str {
        short_name
            .and_then(|s| s.split_whitespace().next())
            .and_then(|key| self.get(key))
            .unwrap_or(NOT_FOUND)
    }
}

impl FromIterator<(String, String)> for NameMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
