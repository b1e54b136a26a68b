use crate::{Error, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Key the last submitted order numbers are stored under
pub const LAST_ORDER_KEY: &str = "lastOrderNumber";

/// Durable string key-value storage local to this machine
pub trait SessionStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn store(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// A JSON object file. Unknown keys are preserved on write.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `~/.calltally/session.json`
    pub fn default_path() -> Result<PathBuf> {
        Ok(crate::settings::app_dir()?.join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(Error::Session(format!(
                "{} does not contain a JSON object",
                self.path.display()
            ))),
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(map)?)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let map = self.read_map()?;
        Ok(map.get(key).and_then(Value::as_str).map(str::to_string))
    }

    fn store(&self, key: &str, value: &str) -> Result<()> {
        // A corrupt file is replaced rather than blocking every later save.
        let mut map = self.read_map().unwrap_or_else(|e| {
            tracing::warn!("Discarding unreadable session file: {}", e);
            Map::new()
        });
        map.insert(key.to_string(), Value::String(value.to_string()));
        self.write_map(&map)?;

        tracing::debug!("Stored {} in {}", key, self.path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// The last submitted order numbers, persisted plus an in-memory mirror.
pub struct SessionState<S> {
    store: S,
    last_order: Option<String>,
}

impl<S: SessionStore> SessionState<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            last_order: None,
        }
    }

    /// Persisted value, or an empty string when nothing was saved yet.
    pub fn get(&mut self) -> Result<String> {
        let value = self.store.load(LAST_ORDER_KEY)?.unwrap_or_default();
        if !value.is_empty() {
            self.last_order = Some(value.clone());
        }
        Ok(value)
    }

    /// Overwrite the saved value. The mirror is updated even if the write fails.
    pub fn set(&mut self, value: &str) -> Result<()> {
        self.last_order = Some(value.to_string());
        self.store.store(LAST_ORDER_KEY, value)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.last_order = None;
        self.store.remove(LAST_ORDER_KEY)
    }

    pub fn last_order(&self) -> Option<&str> {
        self.last_order.as_deref()
    }
}
