//! Layered agent configuration.
//!
//! Sources, later ones win:
//! 1) built-in defaults (registry disabled)
//! 2) YAML file passed with `--config`
//! 3) environment variables `APP__*`, nested with `__`
//!    (e.g. `APP__REGISTRY__ENABLED=true`)

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use service_registry::ServiceRegistryConfig;

pub const ENV_PREFIX: &str = "APP__";

/// Logging section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is not set.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            json: false,
        }
    }
}

/// Whole agent configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    pub logging: LoggingConfig,
    pub registry: ServiceRegistryConfig,
}

impl AgentConfig {
    /// Merge defaults, the optional YAML file and the environment.
    ///
    /// # Errors
    /// Returns a figment error if a source cannot be read or the merged
    /// document does not match the configuration schema.
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(path).extract()
    }

    /// Configuration as shown by `--print-config`, with secrets masked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            logging: self.logging.clone(),
            registry: self.registry.redacted(),
        }
    }

    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}
