//! Configuration for the service registry module.

use std::fmt;

use serde::{Deserialize, Serialize};
use service_registry_sdk::ServiceDescriptor;

/// Backend connection options, passed verbatim to the backend constructor.
pub type ConnectionOptions = serde_json::Map<String, serde_json::Value>;

/// Connection option keys whose values are never displayed.
const SECRET_OPTION_KEYS: &[&str] = &["token"];

const REDACTED: &str = "[REDACTED]";

/// Module configuration.
///
/// The registry is active only when `enabled` is set AND `connection` carries
/// at least one option; otherwise every operation is skipped.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceRegistryConfig {
    /// Master switch for the registry integration.
    pub enabled: bool,

    /// Backend connection options (host, port, scheme, token, ...).
    pub connection: ConnectionOptions,

    /// Descriptor this process registers about itself.
    pub service: ServiceDescriptor,
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("service.{field} must be set when the registry is enabled")]
    MissingField { field: &'static str },
    #[error("service.port must be non-zero when the registry is enabled")]
    InvalidPort,
}

impl ServiceRegistryConfig {
    /// Whether any operation may touch the backend.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enabled && !self.connection.is_empty()
    }

    /// Check that an active configuration carries a usable descriptor.
    ///
    /// Inactive configurations are always valid.
    ///
    /// # Errors
    /// Returns `ConfigError` if the descriptor lacks an id, a name, or a port.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.is_active() {
            return Ok(());
        }
        if self.service.id.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "id" });
        }
        if self.service.name.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "name" });
        }
        if self.service.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        Ok(())
    }

    /// Copy of this configuration with secret connection options masked,
    /// suitable for printing.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            connection: redact_options(&self.connection),
            ..self.clone()
        }
    }
}

fn redact_options(options: &ConnectionOptions) -> ConnectionOptions {
    options
        .iter()
        .map(|(key, value)| {
            let value = if SECRET_OPTION_KEYS.contains(&key.as_str()) {
                serde_json::Value::String(REDACTED.to_owned())
            } else {
                value.clone()
            };
            (key.clone(), value)
        })
        .collect()
}

impl fmt::Debug for ServiceRegistryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistryConfig")
            .field("enabled", &self.enabled)
            .field("connection", &redact_options(&self.connection))
            .field("service", &self.service)
            .finish()
    }
}
