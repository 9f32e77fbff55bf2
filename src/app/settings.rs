use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::error::{AppError, Result};

/// Persisted application settings, loaded from the platform config directory.
///
/// Every field carries a serde default so configs written by older versions
/// keep loading after new fields appear.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppSettings {
    #[serde(default = "default_highlighting_enabled")]
    pub highlighting_enabled: bool,

    /// Milliseconds of typing quiet before a highlight pass runs.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Maximum number of entries shown in the recent-files panel.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    /// When true, closing the last tab opens a fresh blank tab instead of
    /// the welcome screen.
    #[serde(default = "default_blank_tab_on_last_close")]
    pub blank_tab_on_last_close: bool,

    /// Overrides the platform config location when set.
    #[serde(skip)]
    pub(crate) config_path: Option<PathBuf>,
}

fn default_highlighting_enabled() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    150
}

fn default_recent_limit() -> usize {
    15
}

fn default_blank_tab_on_last_close() -> bool {
    false
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            highlighting_enabled: default_highlighting_enabled(),
            debounce_ms: default_debounce_ms(),
            recent_limit: default_recent_limit(),
            blank_tab_on_last_close: default_blank_tab_on_last_close(),
            config_path: None,
        }
    }
}

impl AppSettings {
    /// Load settings from disk, falling back to defaults if the file doesn't
    /// exist or can't be parsed.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Failed to load settings, using defaults: {}", e);
                Self::default()
            }
        }
    }

    fn try_load() -> Result<Self> {
        let path = Self::get_config_path()?;
        let content = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        let path = match &self.config_path {
            Some(path) => path.clone(),
            None => Self::get_config_path()?,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AppError::Settings("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("quillpad").join("settings.json"))
    }
}
