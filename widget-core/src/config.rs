use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{i18n::Locale, model::Coordinates};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_LATITUDE: f64 = 30.033333;
pub const DEFAULT_LONGITUDE: f64 = 31.233334;
pub const DEFAULT_LOCATION_LABEL: &str = "Cairo";
pub const DEFAULT_API_KEY: &str = "bc37e17c9b846169b024d9baad98cf8e";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Deploy-time settings of the widget, stored on disk as TOML.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// latitude = 30.033333
/// longitude = 31.233334
/// location_label = "Cairo"
/// default_locale = "ar"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Shown in the card header; not derived from the coordinates.
    pub location_label: String,
    pub base_url: String,
    pub default_locale: Locale,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: DEFAULT_API_KEY.to_string(),
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            location_label: DEFAULT_LOCATION_LABEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            default_locale: Locale::default(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Load config from disk, or return the built-in defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use the built-in location.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-widget", "weather-widget")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(anyhow!(
                "No API key configured.\n\
                 Hint: run `weather-widget configure` and enter your OpenWeather API key."
            ));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(anyhow!("Latitude {} is outside -90..=90", self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(anyhow!("Longitude {} is outside -180..=180", self.longitude));
        }
        Ok(())
    }
}
