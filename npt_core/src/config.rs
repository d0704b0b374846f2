//! Configuration file support for the NPT calculator.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/npt/config.toml`.

use crate::form::FormDefaults;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub defaults: FormDefaults,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_dir().join(".local/share"));
    base.join("npt")
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| home_dir().join(".config"));
        base.join("npt").join("config.toml")
    }

    /// Path of the preference store inside the data directory
    pub fn preferences_path(&self) -> PathBuf {
        self.data.data_dir.join("preferences.json")
    }

    /// Reject defaults that would feed a division by zero
    ///
    /// Form defaults are the last line before the engine, so they must be
    /// usable where a typed value was not.
    pub fn validate(&self) -> Result<()> {
        let d = &self.defaults;
        let positive = [
            ("weight_kg", d.weight_kg),
            ("height_cm", d.height_cm),
            ("amino_acid_percent", d.amino_acid_percent),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::Config(format!(
                    "defaults.{} must be positive, got {}",
                    name, value
                )));
            }
        }

        if !(0.0..=1.0).contains(&d.start_fraction) {
            return Err(Error::Config(format!(
                "defaults.start_fraction must be within 0.0-1.0, got {}",
                d.start_fraction
            )));
        }
        if !(0.0..=100.0).contains(&d.glucose_percent) {
            return Err(Error::Config(format!(
                "defaults.glucose_percent must be within 0-100, got {}",
                d.glucose_percent
            )));
        }
        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
