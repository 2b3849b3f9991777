use roster_types::{Formation, GameFormat};
use std::env;
use thiserror::Error;

use roster_core::{DEFAULT_MATCH_MINUTES, default_formation, find_formation};
use roster_persistence::connection::DEFAULT_DATABASE_URL;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub default_match_minutes: i32,
    pub game_format: GameFormat,
    /// Position names are restricted to this formation's slots.
    pub formation: Formation,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup, applying defaults for missing keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value })?,
            None => 8080,
        };

        let default_match_minutes = match lookup("DEFAULT_MATCH_MINUTES") {
            Some(value) => match value.parse::<i32>() {
                Ok(minutes) if minutes > 0 => minutes,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "DEFAULT_MATCH_MINUTES",
                        value,
                    });
                }
            },
            None => DEFAULT_MATCH_MINUTES,
        };

        let game_format = match lookup("GAME_FORMAT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "GAME_FORMAT",
                value,
            })?,
            None => GameFormat::default(),
        };

        // A formation must belong to the configured format.
        let formation = match lookup("FORMATION") {
            Some(value) => match find_formation(value.trim()) {
                Some(formation) if formation.format == game_format => formation,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "FORMATION",
                        value,
                    });
                }
            },
            None => default_formation(game_format),
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            default_match_minutes,
            game_format,
            formation,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            default_match_minutes: DEFAULT_MATCH_MINUTES,
            game_format: GameFormat::default(),
            formation: default_formation(GameFormat::default()),
        }
    }
}
