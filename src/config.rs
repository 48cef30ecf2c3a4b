// src/config.rs
use std::net::SocketAddr;

use crate::error::EncodeError;
use crate::ndef;

pub const ENV_ADDR: &str = "EXHIBIT_TAG_ADDR";
pub const ENV_LANG: &str = "EXHIBIT_TAG_LANG";
pub const ENV_EVENT_CAPACITY: &str = "EXHIBIT_TAG_EVENT_CAPACITY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a socket address: {source}")]
    InvalidAddr {
        var: &'static str,
        source: std::net::AddrParseError,
    },

    #[error("{var} is not a valid language code: {source}")]
    InvalidLanguage {
        var: &'static str,
        source: EncodeError,
    },

    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidCapacity { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub listen_addr: SocketAddr,
    /// Language written into text records when a request names none.
    pub default_language: String,
    /// Buffered events per broadcast channel before slow clients lag.
    pub event_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3500)),
            default_language: ndef::DEFAULT_LANGUAGE.to_string(),
            event_capacity: 100,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from a variable lookup; unset variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(addr) = lookup(ENV_ADDR) {
            config.listen_addr = addr
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidAddr {
                    var: ENV_ADDR,
                    source,
                })?;
        }

        if let Some(lang) = lookup(ENV_LANG) {
            ndef::validate_language(&lang).map_err(|source| ConfigError::InvalidLanguage {
                var: ENV_LANG,
                source,
            })?;
            config.default_language = lang;
        }

        if let Some(value) = lookup(ENV_EVENT_CAPACITY) {
            config.event_capacity = value
                .trim()
                .parse()
                .ok()
                .filter(|&n: &usize| n > 0)
                .ok_or(ConfigError::InvalidCapacity {
                    var: ENV_EVENT_CAPACITY,
                    value,
                })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.listen_addr.port(), 3500);
        assert_eq!(config.default_language, "en");
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            (ENV_ADDR, "0.0.0.0:8080"),
            (ENV_LANG, "fr"),
            (ENV_EVENT_CAPACITY, "16"),
        ]))
        .unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.default_language, "fr");
        assert_eq!(config.event_capacity, 16);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[(ENV_ADDR, "localhost")])),
            Err(ConfigError::InvalidAddr { .. })
        ));
        let long = "x".repeat(64);
        assert!(matches!(
            Config::from_lookup(lookup(&[(ENV_LANG, long.as_str())])),
            Err(ConfigError::InvalidLanguage {
                source: EncodeError::LanguageTooLong { len: 64 },
                ..
            })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[(ENV_EVENT_CAPACITY, "0")])),
            Err(ConfigError::InvalidCapacity { .. })
        ));
    }
}
