//! Configuration management for the todo application.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Unparsable values fall back to the default and log a warning.

use crate::reducer::TodoEnvironment;
use crate::view::DEFAULT_PLACEHOLDER;
use snapstore_core::environment::{SequentialIdGenerator, SystemClock};
use snapstore_runtime::StoreConfig;
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// How new item ids are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStrategy {
    /// Random v4 UUIDs
    #[default]
    Random,
    /// Monotonic counter starting at 1
    Sequential,
}

/// Unknown value for `TODO_ID_STRATEGY`
#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown id strategy `{0}` (expected `random` or `sequential`)")]
pub struct UnknownIdStrategy(String);

impl FromStr for IdStrategy {
    type Err = UnknownIdStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" | "uuid" => Ok(Self::Random),
            "sequential" | "counter" => Ok(Self::Sequential),
            other => Err(UnknownIdStrategy(other.to_string())),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Store name used in logs and metric labels (`TODO_STORE_NAME`, default `todo`)
    pub store_name: String,
    /// Id generation (`TODO_ID_STRATEGY`, default `random`)
    pub id_strategy: IdStrategy,
    /// Record and expose metrics (`TODO_METRICS`, default `false`)
    pub metrics: bool,
    /// Message shown for an empty list (`TODO_PLACEHOLDER`)
    pub placeholder: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_name: "todo".to_string(),
            id_strategy: IdStrategy::default(),
            metrics: false,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            store_name: lookup("TODO_STORE_NAME")
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(defaults.store_name),
            id_strategy: parse_or("TODO_ID_STRATEGY", lookup("TODO_ID_STRATEGY"), defaults.id_strategy),
            metrics: parse_or("TODO_METRICS", lookup("TODO_METRICS"), defaults.metrics),
            placeholder: lookup("TODO_PLACEHOLDER")
                .filter(|text| !text.trim().is_empty())
                .unwrap_or(defaults.placeholder),
        }
    }

    /// Store configuration derived from this config
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::default()
            .with_name(self.store_name.clone())
            .with_metrics(self.metrics)
    }

    /// Reducer environment derived from this config
    #[must_use]
    pub fn environment(&self) -> TodoEnvironment {
        match self.id_strategy {
            IdStrategy::Random => TodoEnvironment::system(),
            IdStrategy::Sequential => {
                TodoEnvironment::new(Arc::new(SystemClock), Arc::new(SequentialIdGenerator::new()))
            },
        }
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value.map(|raw| raw.trim().parse::<T>()) {
        None => default,
        Some(Ok(parsed)) => parsed,
        Some(Err(error)) => {
            tracing::warn!(key, %error, "Invalid configuration value, using default");
            default
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapstore_core::Uuid;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config_from(&[]), Config::default());
    }

    #[test]
    fn reads_all_values() {
        let config = config_from(&[
            ("TODO_STORE_NAME", "groceries"),
            ("TODO_ID_STRATEGY", "Sequential"),
            ("TODO_METRICS", "true"),
            ("TODO_PLACEHOLDER", "할 일이 없습니다"),
        ]);

        assert_eq!(config.store_name, "groceries");
        assert_eq!(config.id_strategy, IdStrategy::Sequential);
        assert!(config.metrics);
        assert_eq!(config.placeholder, "할 일이 없습니다");

        let store_config = config.store_config();
        assert_eq!(store_config.name, "groceries");
        assert!(store_config.record_metrics);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config_from(&[
            ("TODO_STORE_NAME", "  "),
            ("TODO_ID_STRATEGY", "millis"),
            ("TODO_METRICS", "sure"),
        ]);

        assert_eq!(config, Config::default());
    }

    #[test]
    fn id_strategy_parsing() {
        assert_eq!("uuid".parse(), Ok(IdStrategy::Random));
        assert_eq!(" counter ".parse(), Ok(IdStrategy::Sequential));
        assert!("clock".parse::<IdStrategy>().is_err());
    }

    #[test]
    fn sequential_environment_counts_from_one() {
        let config = config_from(&[("TODO_ID_STRATEGY", "sequential")]);
        let env = config.environment();

        assert_eq!(env.ids.next_id(), Uuid::from_u128(1));
        assert_eq!(env.ids.next_id(), Uuid::from_u128(2));
    }
}
