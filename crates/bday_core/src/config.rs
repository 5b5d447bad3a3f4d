//! # Simulation Configuration
//!
//! Run settings for the driver: group size, tick speed and an optional seed.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = SimConfig::load("runs/fast_40.json")?;
//! let driver = SimulationDriver::new(config)?;
//! ```
//!
//! `SimConfig::from_env()` reads the file named by `BDAY_SIM_CONFIG_PATH`
//! and falls back to defaults when the variable is unset or blank.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use std::{env, fs};

use crate::counter::{MAX_GROUP_SIZE, MIN_GROUP_SIZE};
use crate::error::{CoreError, Result};

pub const SIM_CONFIG_PATH_ENV: &str = "BDAY_SIM_CONFIG_PATH";

pub const DEFAULT_GROUP_SIZE: u32 = 23;

// ========== Speed Presets ==========

/// Tick speed presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl Speed {
    pub fn interval_ms(self) -> u64 {
        match self {
            Speed::Slow => 600,
            Speed::Normal => 200,
            Speed::Fast => 50,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slow" => Some(Speed::Slow),
            "normal" => Some(Speed::Normal),
            "fast" => Some(Speed::Fast),
            _ => None,
        }
    }
}

// ========== SimConfig ==========

fn default_group_size() -> u32 {
    DEFAULT_GROUP_SIZE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// People per trial (default: 23)
    #[serde(default = "default_group_size")]
    pub group_size: u32,

    /// Preset tick speed (default: normal)
    #[serde(default)]
    pub speed: Speed,

    /// Explicit tick interval; overrides `speed` when set
    #[serde(default)]
    pub interval_ms: Option<u64>,

    /// RNG seed; fresh entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,

    /// Stop after this many trials; run until stopped when absent
    #[serde(default)]
    pub max_trials: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            group_size: DEFAULT_GROUP_SIZE,
            speed: Speed::Normal,
            interval_ms: None,
            seed: None,
            max_trials: None,
        }
    }
}

impl SimConfig {
    /// Load SimConfig from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Parse SimConfig from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Config file named by `BDAY_SIM_CONFIG_PATH`, or defaults.
    pub fn from_env() -> Result<Self> {
        let Ok(path) = env::var(SIM_CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        log::info!("Loading simulation config from {}={}", SIM_CONFIG_PATH_ENV, path);
        Self::load(path)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&self.group_size) {
            return Err(CoreError::InvalidGroupSize {
                value: self.group_size,
                min: MIN_GROUP_SIZE,
                max: MAX_GROUP_SIZE,
            });
        }
        if self.interval_ms == Some(0) {
            return Err(CoreError::InvalidInterval(0));
        }
        Ok(())
    }

    /// Effective tick interval.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.unwrap_or_else(|| self.speed.interval_ms()))
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_speed_presets() {
        assert_eq!(Speed::Slow.interval_ms(), 600);
        assert_eq!(Speed::Normal.interval_ms(), 200);
        assert_eq!(Speed::Fast.interval_ms(), 50);
        assert_eq!(Speed::parse(" FAST "), Some(Speed::Fast));
        assert_eq!(Speed::parse("warp"), None);
    }

    #[test]
    fn test_defaults_from_empty_json() {
        let config = SimConfig::from_json("{}").unwrap();
        assert_eq!(config, SimConfig::default());
        assert_eq!(config.interval(), Duration::from_millis(200));
    }

    #[test]
    fn test_interval_override() {
        let config =
            SimConfig::from_json(r#"{"group_size": 40, "speed": "slow", "interval_ms": 75}"#)
                .unwrap();
        assert_eq!(config.group_size, 40);
        assert_eq!(config.speed, Speed::Slow);
        assert_eq!(config.interval(), Duration::from_millis(75));
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            SimConfig::from_json(r#"{"group_size": 17}"#),
            Err(CoreError::InvalidGroupSize { value: 17, .. })
        ));
        assert!(matches!(
            SimConfig::from_json(r#"{"group_size": 51}"#),
            Err(CoreError::InvalidGroupSize { value: 51, .. })
        ));
        assert!(matches!(
            SimConfig::from_json(r#"{"interval_ms": 0}"#),
            Err(CoreError::InvalidInterval(0))
        ));
        assert!(matches!(SimConfig::from_json("not json"), Err(CoreError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"group_size": 30, "speed": "fast", "seed": 7, "max_trials": 10}}"#)
            .unwrap();

        let config = SimConfig::load(file.path()).unwrap();
        assert_eq!(config.group_size, 30);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_trials, Some(10));
        assert_eq!(config.interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SimConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
    }

    #[test]
    fn test_round_trip_json() {
        let config = SimConfig { seed: Some(11), ..SimConfig::default() };
        let parsed = SimConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
