//! Service models shared by the registry API and its implementations.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend-defined health check definition, passed through verbatim.
pub type HealthCheckSpec = serde_json::Map<String, serde_json::Value>;

/// The record this process registers about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceDescriptor {
    /// Instance ID, unique within the backend.
    pub id: String,

    /// Logical service name shared by all instances.
    pub name: String,

    /// Address other processes should dial.
    pub address: String,

    /// Port other processes should dial.
    pub port: u16,

    /// Free-form tags attached to the registration.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Free-form key/value metadata attached to the registration.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,

    /// Health check run by the backend once registered.
    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    pub check: HealthCheckSpec,
}

/// A resolved, dialable service address.
///
/// Displays as `{address}:{port}` exactly as the backend reported them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAddress {
    pub address: String,
    pub port: u16,
}

impl ServiceAddress {
    #[must_use]
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
        }
    }
}

impl fmt::Display for ServiceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

/// Result of a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// The backend acknowledged the registration.
    Registered { service_name: String },
    /// Registry integration is disabled; nothing was sent.
    Skipped,
}

impl RegisterOutcome {
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

/// Result of an address lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The instance was found in the backend listing.
    Resolved(ServiceAddress),
    /// Registry integration is disabled; nothing was queried.
    Skipped,
}

impl LookupOutcome {
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    /// The resolved address, if any.
    #[must_use]
    pub fn address(&self) -> Option<&ServiceAddress> {
        match self {
            Self::Resolved(addr) => Some(addr),
            Self::Skipped => None,
        }
    }
}
