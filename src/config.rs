//! Configuration management for rankbar
//!
//! Handles loading and saving user preferences: where the index page comes
//! from, how rank transitions are drawn, and the default log level.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::rank::ArrowStyle;
use crate::source::DEFAULT_SOURCE_URL;

/// How to draw the arrow in a rank transition
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowSetting {
    /// Unicode if the locale is UTF-8, ASCII otherwise
    #[default]
    Auto,
    Unicode,
    Ascii,
}

impl ArrowSetting {
    pub fn resolve(self) -> ArrowStyle {
        match self {
            Self::Auto => ArrowStyle::detect(),
            Self::Unicode => ArrowStyle::Unicode,
            Self::Ascii => ArrowStyle::Ascii,
        }
    }
}

/// rankbar configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Index page to scrape
    #[serde(default = "default_source_url")]
    pub source_url: String,

    /// Transition arrow: "auto", "unicode" or "ascii"
    #[serde(default)]
    pub arrow: ArrowSetting,

    /// Default tracing level when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            arrow: ArrowSetting::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Get config directory path (~/.rankbar)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".rankbar"))
    }

    /// Get config file path (~/.rankbar/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from the default location, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from `path`, or return default if not found
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        // Atomic write: write to temp file then rename
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, &contents)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path)
            .with_context(|| format!("Failed to rename config file to {}", path.display()))?;

        Ok(())
    }
}
