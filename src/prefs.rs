//! Persistent key-value preferences
//!
//! A flat string-to-string map that survives restarts. The rank cache is the
//! only user; it keeps two keys (see `rank::snapshot`).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::Config;

/// String key-value store
pub trait PrefStore {
    /// Value stored under `key`, or `default` if absent
    fn get(&self, key: &str, default: &str) -> String;

    /// Store `value` under `key`
    fn put(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete `key` if present
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Preferences kept in a JSON file, rewritten on every change
pub struct FilePrefs {
    values: BTreeMap<String, String>,
    path: PathBuf,
}

impl FilePrefs {
    /// Default location (~/.rankbar/prefs.json)
    pub fn default_path() -> Result<PathBuf> {
        Ok(Config::config_dir()?.join("prefs.json"))
    }

    /// Open the store at the default location
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    /// Open the store at `path`.
    ///
    /// A missing file is an empty store. A corrupt file is also treated as
    /// empty so the next successful fetch replaces it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let values = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read preferences from {}", path.display()))?;
            match serde_json::from_str(&content) {
                Ok(values) => values,
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "discarding unreadable preferences");
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self { values, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(&self.values).context("Failed to serialize preferences")?;

        // Atomic write: write to temp file then rename
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, &contents)
            .with_context(|| format!("Failed to write preferences to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to rename preferences file to {}", self.path.display()))?;

        Ok(())
    }
}

impl PrefStore for FilePrefs {
    fn get(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.values.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

/// In-memory store
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryPrefs {
    values: BTreeMap<String, String>,
}

#[cfg(test)]
impl PrefStore for MemoryPrefs {
    fn get(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}
