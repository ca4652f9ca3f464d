//! Configuration file support for ironlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/ironlog/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub progression: ProgressionConfig,

    #[serde(default)]
    pub analytics: AnalyticsConfig,
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

/// Active-workout defaults
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// RPE pre-filled in the set input
    #[serde(default = "default_rpe")]
    pub default_rpe: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_rpe: default_rpe(),
        }
    }
}

/// Suggested-weight heuristic parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressionConfig {
    /// Average RPE below which the next session adds weight
    #[serde(default = "default_rpe_threshold")]
    pub rpe_threshold: f64,

    #[serde(default = "default_weight_increment_kg")]
    pub weight_increment_kg: f64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            rpe_threshold: default_rpe_threshold(),
            weight_increment_kg: default_weight_increment_kg(),
        }
    }
}

/// History and stats windows
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_weekly_weeks")]
    pub weekly_weeks: u32,

    #[serde(default = "default_history_days")]
    pub history_days: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            weekly_weeks: default_weekly_weeks(),
            history_days: default_history_days(),
        }
    }
}

// Default value functions
fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()))
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_dir().join(".local/share"));
    base.join("ironlog")
}

fn default_rpe() -> f64 {
    8.0
}

fn default_rpe_threshold() -> f64 {
    7.5
}

fn default_weight_increment_kg() -> f64 {
    2.5
}

fn default_weekly_weeks() -> u32 {
    12
}

fn default_history_days() -> u32 {
    30
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

    /// Load and validate configuration from a specific path
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
        base.join("ironlog").join("config.toml")
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !(1.0..=10.0).contains(&self.session.default_rpe) {
            return Err(Error::Config(format!(
                "session.default_rpe must be within 1-10 (got {})",
                self.session.default_rpe
            )));
        }
        if !(1.0..=10.0).contains(&self.progression.rpe_threshold) {
            return Err(Error::Config(format!(
                "progression.rpe_threshold must be within 1-10 (got {})",
                self.progression.rpe_threshold
            )));
        }
        if self.progression.weight_increment_kg < 0.0 {
            return Err(Error::Config(
                "progression.weight_increment_kg must not be negative".into(),
            ));
        }
        if self.analytics.weekly_weeks == 0 {
            return Err(Error::Config("analytics.weekly_weeks must be > 0".into()));
        }
        if self.analytics.history_days == 0 {
            return Err(Error::Config("analytics.history_days must be > 0".into()));
        }
        Ok(())
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
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
