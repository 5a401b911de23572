//! Runtime configuration read from the environment.
//!
//! | variable                | default                      |
//! |-------------------------|------------------------------|
//! | `BOOKSHELF_BASE_URL`    | `https://www.googleapis.com` |
//! | `BOOKSHELF_MAX_RESULTS` | `10` (accepted `1..=40`)     |
//! | `BOOKSHELF_LOG`         | `info`                       |

use thiserror::Error;

use crate::client::{DEFAULT_BASE_URL, MAX_RESULTS_LIMIT};
use crate::session::DEFAULT_MAX_RESULTS;

pub const BASE_URL_VAR: &str = "BOOKSHELF_BASE_URL";
pub const MAX_RESULTS_VAR: &str = "BOOKSHELF_MAX_RESULTS";
pub const LOG_VAR: &str = "BOOKSHELF_LOG";

pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be an integer within 1..={max}, got {value:?}")]
    InvalidMaxResults { var: &'static str, value: String, max: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub max_results: u32,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Unset or blank values fall back
    /// to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let max_results = match get(MAX_RESULTS_VAR) {
            None => defaults.max_results,
            Some(value) => match value.parse::<u32>() {
                Ok(n) if (1..=MAX_RESULTS_LIMIT).contains(&n) => n,
                _ => {
                    return Err(ConfigError::InvalidMaxResults {
                        var: MAX_RESULTS_VAR,
                        value,
                        max: MAX_RESULTS_LIMIT,
                    })
                }
            },
        };

        Ok(Self {
            base_url: get(BASE_URL_VAR).unwrap_or(defaults.base_url),
            max_results,
            log_filter: get(LOG_VAR).unwrap_or(defaults.log_filter),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(Config::from_lookup(lookup(&[])).unwrap(), Config::default());
    }

    #[test]
    fn values_override_defaults() {
        let config = Config::from_lookup(lookup(&[
            (BASE_URL_VAR, "http://127.0.0.1:3000"),
            (MAX_RESULTS_VAR, "25"),
            (LOG_VAR, "bookshelf_core=debug"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.max_results, 25);
        assert_eq!(config.log_filter, "bookshelf_core=debug");
    }

    #[test]
    fn blank_values_fall_back() {
        let config = Config::from_lookup(lookup(&[(BASE_URL_VAR, "  "), (MAX_RESULTS_VAR, "")])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn bad_max_results_is_rejected() {
        for bad in ["0", "41", "ten", "-1"] {
            let err = Config::from_lookup(lookup(&[(MAX_RESULTS_VAR, bad)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidMaxResults { .. }), "{bad}");
        }
    }
}
