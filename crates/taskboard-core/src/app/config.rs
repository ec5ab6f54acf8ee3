//! Store configuration.
//!
//! Layered with the `config` crate: an optional TOML file, then environment
//! variables prefixed with `TASKBOARD_` (e.g. `TASKBOARD_WRITE_POLICY=concurrent`).

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use super::transition::EndDatePolicy;

pub const DEFAULT_PAGE_SIZE: usize = 7;
pub const DEFAULT_COLOR: &str = "#3B82F6";

/// How mutating operations are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WritePolicy {
    /// One mutation (and its refetch) in flight at a time, in call order.
    #[default]
    Serialized,
    /// Mutations overlap; the last refetch to resolve wins, whatever order
    /// the user issued them in.
    Concurrent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub write_policy: WritePolicy,
    pub end_date_policy: EndDatePolicy,
    /// Board column page size; "show more" adds one page.
    pub page_size: usize,
    /// Colour given to created tasks that have none.
    pub default_color: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            write_policy: WritePolicy::default(),
            end_date_policy: EndDatePolicy::default(),
            page_size: DEFAULT_PAGE_SIZE,
            default_color: DEFAULT_COLOR.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),

    #[error("page_size must be at least 1")]
    ZeroPageSize,
}

impl StoreConfig {
    /// Load from `path` (if given) and the `TASKBOARD_*` environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(config::Environment::with_prefix("TASKBOARD"));
        Self::from_builder(builder)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml));
        Self::from_builder(builder)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(())
    }
}
