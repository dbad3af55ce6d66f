//! Driver configuration.
//!
//! Holds the simulation parameters plus the run loop settings. Configuration
//! is read from and written to TOML.

use canopy_common::SimError;
use canopy_sim::SimConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "canopy.toml";

/// Errors reading an explicitly requested config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// File is not valid TOML for this config
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// Config path
        path: PathBuf,
        /// Underlying error
        source: toml::de::Error,
    },

    /// Values parsed but out of range
    #[error("Invalid config: {0}")]
    Invalid(#[from] SimError),
}

/// Run loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Ticks to run
    pub ticks: u64,
    /// Pause between ticks in milliseconds (0 = run flat out)
    pub tick_interval_ms: u64,
    /// Log community stats every this many ticks
    pub log_interval: u64,
    /// Stop early once every plant is gone
    pub stop_when_extinct: bool,
    /// Where to write the JSON report (stdout when absent)
    pub report_path: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ticks: 240,
            tick_interval_ms: 0,
            log_interval: 24,
            stop_when_extinct: true,
            report_path: None,
        }
    }
}

/// Full driver configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Simulation parameters
    pub sim: SimConfig,
    /// Run loop settings
    pub run: RunConfig,
}

impl EngineConfig {
    /// Load configuration from the default file location.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific path.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match Self::try_load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{e}; using defaults");
                Self::default()
            },
        }
    }

    /// Load and validate configuration from a path that must exist.
    pub fn try_load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate();
        config.sim.validate()?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Clamp run settings to sensible ranges.
    pub fn validate(&mut self) {
        self.run.log_interval = self.run.log_interval.max(1);
        self.run.tick_interval_ms = self.run.tick_interval_ms.min(60_000);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_sim::RainDuration;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.sim.width, 700);
        assert_eq!(config.sim.height, 500);
        assert_eq!(config.run.ticks, 240);
        assert!(config.run.report_path.is_none());
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();
        config.run.log_interval = 0;
        config.run.tick_interval_ms = 1_000_000;

        config.validate();

        assert_eq!(config.run.log_interval, 1);
        assert_eq!(config.run.tick_interval_ms, 60_000);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("canopy.toml");

        let mut config = EngineConfig::default();
        config.sim.width = 320;
        config.sim.seed = Some(12345);
        config.sim.weather.duration = RainDuration::WallClock { millis: 3000 };
        config.run.ticks = 48;

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = EngineConfig::try_load_from(&config_path).expect("Failed to load config");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = EngineConfig::load_from("/nonexistent/path/canopy.toml");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("canopy.toml");
        fs::write(
            &path,
            "[sim]\nwidth = 200\nplant_count = 5\n\n[sim.weather]\nrain_probability = 0.0\n",
        )
        .expect("write");

        let config = EngineConfig::try_load_from(&path).expect("load");
        assert_eq!(config.sim.width, 200);
        assert_eq!(config.sim.height, 500);
        assert_eq!(config.sim.plant_count, 5);
        assert_eq!(config.sim.weather.rain_probability, 0.0);
        assert_eq!(config.sim.weather.duration, RainDuration::Ticks { count: 10 });
        assert_eq!(config.run.ticks, 240);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("canopy.toml");
        fs::write(&path, "[sim\nwidth = ").expect("write");

        assert!(matches!(
            EngineConfig::try_load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
        // The lenient loader falls back
        assert_eq!(EngineConfig::load_from(&path), EngineConfig::default());
    }

    #[test]
    fn test_out_of_range_file_is_invalid() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("canopy.toml");
        fs::write(&path, "[sim]\nwidth = 0\n").expect("write");

        assert!(matches!(
            EngineConfig::try_load_from(&path),
            Err(ConfigError::Invalid(SimError::InvalidDimensions { .. }))
        ));
    }

    #[test]
    fn test_nan_in_file_is_invalid() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("canopy.toml");
        fs::write(&path, "[sim]\nconsumption_scale = nan\n").expect("write");

        assert!(matches!(
            EngineConfig::try_load_from(&path),
            Err(ConfigError::Invalid(SimError::InvalidParameter { ref name, .. }))
                if name == "consumption_scale"
        ));
    }

    #[test]
    fn test_config_toml_serialization() {
        let config = EngineConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");

        assert!(toml_str.contains("[sim]"));
        assert!(toml_str.contains("rain_probability"));
        assert!(toml_str.contains("ticks"));
    }
}
