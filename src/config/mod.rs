//! Configuration module - environment variable parsing

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::lobby::{LobbyAction, LobbyError, RoomCode};

/// How the game is driven
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    /// Desktop window with keyboard and mouse input
    Window,
    /// No window; replay an input script on a timer
    Headless,
}

impl FromStr for RunMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "window" => Ok(RunMode::Window),
            "headless" => Ok(RunMode::Headless),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Window or headless
    pub run_mode: RunMode,
    /// Create a new room or join the code given in ROOM_CODE
    pub lobby: LobbyAction,
    /// Window size multiplier over the 800x400 canvas
    pub window_scale: f64,
    /// Headless input script; the built-in demo is used when unset
    pub script_path: Option<PathBuf>,
    /// Headless tick cap
    pub max_ticks: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let run_mode = match lookup("RUN_MODE") {
            Some(raw) => raw.parse()?,
            None => RunMode::Window,
        };

        let lobby = match lookup("ROOM_CODE").filter(|raw| !raw.trim().is_empty()) {
            Some(raw) => LobbyAction::Join(RoomCode::parse(&raw)?),
            None => LobbyAction::Create,
        };

        let window_scale = match lookup("WINDOW_SCALE") {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|scale| scale.is_finite() && *scale > 0.0)
                .ok_or(ConfigError::InvalidScale(raw))?,
            None => 1.0,
        };

        let max_ticks = match lookup("MAX_TICKS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber("MAX_TICKS", raw))?,
            None => 3600,
        };

        Ok(Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            run_mode,
            lobby,
            window_scale,
            script_path: lookup("SCRIPT_PATH").map(PathBuf::from),
            max_ticks,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("RUN_MODE must be \"window\" or \"headless\", got {0:?}")]
    InvalidMode(String),

    #[error("Invalid ROOM_CODE: {0}")]
    InvalidRoomCode(#[from] LobbyError),

    #[error("WINDOW_SCALE must be a positive number, got {0:?}")]
    InvalidScale(String),

    #[error("{0} must be a whole number, got {1:?}")]
    InvalidNumber(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_create_a_windowed_room() {
        let config = load(&[]).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.run_mode, RunMode::Window);
        assert_eq!(config.lobby, LobbyAction::Create);
        assert_eq!(config.window_scale, 1.0);
        assert_eq!(config.script_path, None);
        assert_eq!(config.max_ticks, 3600);
    }

    #[test]
    fn room_code_means_join() {
        let config = load(&[("ROOM_CODE", "abc123")]).unwrap();
        assert_eq!(
            config.lobby,
            LobbyAction::Join(RoomCode::parse("ABC123").unwrap())
        );
    }

    #[test]
    fn join_code_with_symbols_is_accepted() {
        let config = load(&[("ROOM_CODE", "ab-12c")]).unwrap();
        assert_eq!(
            config.lobby,
            LobbyAction::Join(RoomCode::parse("AB-12C").unwrap())
        );
    }

    #[test]
    fn blank_room_code_means_create() {
        let config = load(&[("ROOM_CODE", "  ")]).unwrap();
        assert_eq!(config.lobby, LobbyAction::Create);
    }

    #[test]
    fn short_room_code_is_rejected() {
        let err = load(&[("ROOM_CODE", "ABC")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidRoomCode(LobbyError::WrongLength(3))
        ));
    }

    #[test]
    fn headless_settings_are_parsed() {
        let config = load(&[
            ("RUN_MODE", "Headless"),
            ("SCRIPT_PATH", "fight.json"),
            ("MAX_TICKS", "120"),
            ("LOG_LEVEL", "debug"),
        ])
        .unwrap();
        assert_eq!(config.run_mode, RunMode::Headless);
        assert_eq!(config.script_path, Some(PathBuf::from("fight.json")));
        assert_eq!(config.max_ticks, 120);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn bad_values_are_reported() {
        assert!(matches!(
            load(&[("RUN_MODE", "web")]),
            Err(ConfigError::InvalidMode(_))
        ));
        assert!(matches!(
            load(&[("WINDOW_SCALE", "0")]),
            Err(ConfigError::InvalidScale(_))
        ));
        assert!(matches!(
            load(&[("MAX_TICKS", "-1")]),
            Err(ConfigError::InvalidNumber("MAX_TICKS", _))
        ));
    }
}
