//! Todo app configuration.
//!
//! Values come from the environment when running the binary and are plain
//! struct fields everywhere else.

use crate::store::{DEFAULT_ID_PREFIX, TodoStore};
use listkeeper_core::environment::{IdGenerator, RandomIdGenerator, SequentialIdGenerator};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Environment variable selecting the id strategy.
pub const ID_STRATEGY_VAR: &str = "TODO_ID_STRATEGY";

/// Environment variable overriding the id prefix.
pub const ID_PREFIX_VAR: &str = "TODO_ID_PREFIX";

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Unrecognized id strategy name
    #[error("Unknown id strategy '{0}' (expected 'sequential' or 'random')")]
    UnknownIdStrategy(String),
}

/// How new todo ids are generated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdStrategy {
    /// `<prefix>1`, `<prefix>2`, ...
    #[default]
    Sequential,
    /// `<prefix><uuid v4>`
    Random,
}

impl FromStr for IdStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "counter" => Ok(Self::Sequential),
            "random" | "uuid" => Ok(Self::Random),
            other => Err(ConfigError::UnknownIdStrategy(other.to_string())),
        }
    }
}

/// Todo app configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoConfig {
    /// Id generation strategy.
    ///
    /// Default: sequential
    pub id_strategy: IdStrategy,

    /// Text prepended to every id.
    ///
    /// Default: `todo-`
    pub id_prefix: String,
}

impl TodoConfig {
    /// Read configuration from process environment variables
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownIdStrategy`] if `TODO_ID_STRATEGY` holds
    /// an unrecognized value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Same as [`TodoConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(strategy) = lookup(ID_STRATEGY_VAR) {
            config.id_strategy = strategy.parse()?;
        }
        if let Some(prefix) = lookup(ID_PREFIX_VAR) {
            config.id_prefix = prefix;
        }

        Ok(config)
    }

    /// Set the id strategy
    #[must_use]
    pub const fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    /// Set the id prefix
    #[must_use]
    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    /// Id generator for this configuration
    #[must_use]
    pub fn id_generator(&self) -> Arc<dyn IdGenerator> {
        match self.id_strategy {
            IdStrategy::Sequential => Arc::new(SequentialIdGenerator::new(self.id_prefix.clone())),
            IdStrategy::Random => Arc::new(RandomIdGenerator::new(self.id_prefix.clone())),
        }
    }

    /// Empty store using this configuration's id generator
    #[must_use]
    pub fn build_store(&self) -> TodoStore {
        TodoStore::new(self.id_generator())
    }
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::Sequential,
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
        }
    }
}
