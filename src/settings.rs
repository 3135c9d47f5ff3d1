//! Runtime settings
//!
//! Match tuning that hosts may override from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading configuration or content tables
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seconds on the countdown at the start of every run
    pub time_limit_secs: u32,
    /// How often the collision resolver polls (seconds of game time)
    pub resolver_poll_secs: f32,
    /// Coins awarded for any run that is not a win
    pub consolation_reward: u32,
    /// Coins a brand new profile starts with
    pub starting_coins: u32,
    /// Fixed RNG seed (None = seed from entropy)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_limit_secs: 25,
            resolver_poll_secs: 0.1,
            consolation_reward: 10,
            starting_coins: 200,
            seed: None,
        }
    }
}

impl Settings {
    /// Resolver poll interval in ticks (never zero)
    pub fn resolver_poll_ticks(&self) -> u64 {
        crate::secs_to_ticks(self.resolver_poll_secs).max(1)
    }

    /// Read settings from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        if settings.time_limit_secs == 0 {
            return Err(ConfigError::Invalid("time_limit_secs must be positive".into()));
        }
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::info!("Using default settings ({})", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.time_limit_secs, 25);
        assert_eq!(settings.resolver_poll_ticks(), 6);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"seed": 7}"#).unwrap();
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.consolation_reward, 10);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let settings = Settings::load(Path::new("/definitely/not/here.json"));
        assert_eq!(settings.starting_coins, 200);
    }

    #[test]
    fn test_poll_interval_never_zero() {
        let settings = Settings {
            resolver_poll_secs: 0.0,
            ..Default::default()
        };
        assert_eq!(settings.resolver_poll_ticks(), 1);
    }
}
