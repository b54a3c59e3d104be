//! Logger setup for applications embedding the project.
//!
//! The library only emits through the `log` facade; the application decides
//! where the records go by calling [`init_logging`] once at startup.

use std::collections::BTreeMap;

use env_logger::{Builder, Env};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Logger settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default level for every target.
    pub level: String,
    /// Per-module overrides, e.g. `{"bathy_project": "debug"}`.
    pub modules: BTreeMap<String, String>,
    /// Let `RUST_LOG` take precedence over the settings above.
    pub respect_env: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            modules: BTreeMap::new(),
            respect_env: true,
        }
    }
}

impl LogConfig {
    /// Filter string in `env_logger` syntax.
    pub fn filter_spec(&self) -> String {
        let mut directives = vec![self.level.clone()];
        directives.extend(
            self.modules
                .iter()
                .map(|(module, level)| format!("{}={}", module, level)),
        );
        directives.join(",")
    }
}

/// Install the global logger described by `config`.
///
/// Fails if a logger is already installed.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filters = config.filter_spec();

    let mut builder = if config.respect_env {
        Builder::from_env(Env::default().default_filter_or(filters))
    } else {
        let mut builder = Builder::new();
        builder.parse_filters(&filters);
        builder
    };

    builder.try_init()?;
    Ok(())
}
