//! Environment flags and window configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::Result;

pub const DEBUG_ENV: &str = "DEBUG";
pub const FILE_LOG_ENV: &str = "FILE_LOG";
pub const TRACE_LOGGERS_ENV: &str = "GAME_TRACE_LOGGERS";

/// Values (compared lower-case) that turn a boolean env variable off
pub const FALSE_VALUES: [&str; 4] = ["false", "0", "no", "disable"];

/// Interpret the content of a boolean env variable.
pub fn parse_bool(value: &str) -> bool {
    let value = value.to_lowercase();
    !FALSE_VALUES.contains(&value.as_str())
}

/// Unset is `false`, a false-ish value is `false`, anything else is `true`.
pub fn env_bool(name: &str) -> bool {
    std::env::var_os(name)
        .map(|value| parse_bool(&value.to_string_lossy()))
        .unwrap_or(false)
}

/// Process-wide flags read from the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFlags {
    /// Verbose (debug level) logging
    pub debug: bool,
    /// Also log into a rotating file under `logs/`
    pub file_log: bool,
    /// Logger selection for trace level, see [`crate::logging::LevelPlan`]
    pub trace_loggers: Option<String>,
}

impl EnvFlags {
    pub fn from_env() -> Self {
        Self {
            debug: env_bool(DEBUG_ENV),
            file_log: env_bool(FILE_LOG_ENV),
            trace_loggers: std::env::var(TRACE_LOGGERS_ENV).ok(),
        }
    }
}

/// Window and pacing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    /// Target iterations per second; 0 disables pacing
    pub tick_rate: u32,
    pub title: String,
    pub background: Color,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            tick_rate: 30,
            title: "Game".to_string(),
            background: Color::GREY,
        }
    }
}

impl WindowConfig {
    /// Parse TOML, falling back to defaults for missing keys
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn false_values_disable() {
        for value in ["false", "FALSE", "0", "no", "No", "disable", "DISABLE"] {
            assert!(!parse_bool(value), "{value} should be false");
        }
    }

    #[test]
    fn anything_else_enables() {
        for value in ["true", "1", "yes", "on", "", "off"] {
            assert!(parse_bool(value), "{value:?} should be true");
        }
    }

    #[test]
    fn unset_env_is_false() {
        assert!(!env_bool("GAME_TEST_SURELY_UNSET_VARIABLE"));
    }

    #[test]
    fn window_defaults() {
        let config = WindowConfig::default();
        assert_eq!((config.width, config.height, config.tick_rate), (800, 600, 30));
        assert_eq!(config.background, Color::GREY);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = WindowConfig::from_toml_str("width = 320\ntick_rate = 60").unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 600);
        assert_eq!(config.tick_rate, 60);
        assert_eq!(config.title, "Game");
    }

    #[test]
    fn background_from_toml() {
        let config =
            WindowConfig::from_toml_str("[background]\nr = 10\ng = 20\nb = 30\n").unwrap();
        assert_eq!(config.background, Color::rgb(10, 20, 30));
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(WindowConfig::from_toml_str("width = \"wide\"").is_err());
    }
}
