//! Runtime configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors loading or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Top-level configuration, stored as TOML.
///
/// Intervals are expressed in minutes and converted to durations by the
/// consumers; the alert toggle is a runtime switch, not a config field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Camera device index
    pub camera_id: u32,

    /// Requested capture width
    pub capture_width: u32,

    /// Requested capture height
    pub capture_height: u32,

    /// Maximum width handed to the pose detector; wider frames are
    /// downscaled before inference
    pub process_width: u32,

    /// Minutes between break reminders
    pub break_interval_mins: u32,

    /// Minimum minutes between posture alerts
    pub posture_check_interval_mins: u32,

    /// Score at or above which a sample earns good-posture points
    pub good_score: u8,

    /// Score at or above which a sample earns excellent-posture points
    pub excellent_score: u8,

    /// Milliseconds the pipeline pauses between ticks
    pub tick_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera_id: 0,
            capture_width: 640,
            capture_height: 480,
            process_width: 640,
            break_interval_mins: 30,
            posture_check_interval_mins: 5,
            good_score: 70,
            excellent_score: 85,
            tick_interval_ms: 200,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_intervals() {
        let config = Config::default();
        assert_eq!(config.break_interval_mins, 30);
        assert_eq!(config.posture_check_interval_mins, 5);
        assert_eq!(config.good_score, 70);
        assert_eq!(config.excellent_score, 85);
    }

    #[test]
    fn round_trips_through_toml() {
        let config = Config {
            camera_id: 2,
            ..Config::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.camera_id, 2);
        assert_eq!(back.process_width, config.process_width);
    }
}
