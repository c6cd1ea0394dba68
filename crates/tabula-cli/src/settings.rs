//! Persistent settings for the `tabula` binary
//!
//! Stored as pretty JSON at `<config dir>/tabula/settings.json`. A missing file
//! means defaults; missing fields take their default value.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tabula_client::{ClientConfig, DEFAULT_BASE_URL};
use tabula_services::{BrowserConfig, CoercionRules, DEFAULT_NUMERIC_COLUMNS, JsonColumnRule};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabulaSettings {
    /// Backend base URL; the `--api-base-url` flag and environment take precedence
    pub api_base_url: Option<String>,
    /// Table opened when none is named
    pub default_table: String,
    /// Table whose JSON column is decoded and validated
    pub weather_cache_table: String,
    pub json_column: String,
    /// Primary-key columns whose values are sent as numbers
    pub numeric_key_columns: Vec<String>,
    pub request_timeout_secs: Option<u64>,
    /// Write JSON log files
    pub json_logs: bool,
}

impl Default for TabulaSettings {
    fn default() -> Self {
        Self {
            api_base_url: None,
            default_table: "weather_cache".to_string(),
            weather_cache_table: "weather_cache".to_string(),
            json_column: "data".to_string(),
            numeric_key_columns: DEFAULT_NUMERIC_COLUMNS.map(String::from).to_vec(),
            request_timeout_secs: None,
            json_logs: false,
        }
    }
}

impl TabulaSettings {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        serde_json::from_str(&content).with_context(|| "Failed to parse settings JSON")
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::settings_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {:?}", path))?;
        Ok(())
    }

    pub fn settings_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not find config directory")?;
        Ok(config_dir.join("tabula").join("settings.json"))
    }

    /// Controller configuration derived from these settings
    pub fn browser_config(&self) -> BrowserConfig {
        BrowserConfig {
            initial_table: Some(self.default_table.clone()).filter(|t| !t.is_empty()),
            json_column: JsonColumnRule {
                table: self.weather_cache_table.clone(),
                column: self.json_column.clone(),
            },
            coercion: CoercionRules::new(self.numeric_key_columns.iter().cloned()),
        }
    }

    /// Client configuration. `override_url` (flag or environment) wins over
    /// the settings file, which wins over the built-in default.
    pub fn client_config(&self, override_url: Option<&str>) -> ClientConfig {
        let base_url = override_url
            .filter(|url| !url.trim().is_empty())
            .or(self.api_base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL);

        let config = ClientConfig::new(base_url);
        match self.request_timeout_secs {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}
