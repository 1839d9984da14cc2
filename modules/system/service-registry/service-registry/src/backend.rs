//! Seam between the registry adapter and a concrete coordination backend.
//!
//! The adapter only ever talks to a backend through these traits, so tests and
//! alternative backends can stand in for the Consul agent.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use service_registry_sdk::ServiceDescriptor;
use thiserror::Error;

use crate::config::ConnectionOptions;

/// A single entry of the backend's agent-level service listing.
///
/// Fields are optional because the backend is free to return partial entries;
/// the adapter decides whether an entry is usable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceEntry {
    pub address: Option<String>,
    pub port: Option<u16>,
}

impl ServiceEntry {
    #[must_use]
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: Some(address.into()),
            port: Some(port),
        }
    }
}

/// Errors reported by a backend implementation.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Connection options could not be turned into a client.
    #[error("invalid connection options: {0}")]
    InvalidOptions(String),

    /// Network or transport failure.
    #[error("backend unreachable: {0}")]
    Unreachable(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The backend did not answer within the request deadline.
    #[error("backend request timed out after {0:?}")]
    Timeout(Duration),

    /// The backend answered with a failure status.
    #[error("backend rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The backend answered with a body that could not be decoded.
    #[error("malformed backend response: {0}")]
    Malformed(String),
}

/// Live connection handle to the backend.
#[async_trait]
pub trait RegistryConnection: Send + Sync {
    /// Register a service instance with the backend agent.
    ///
    /// # Errors
    /// Returns `BackendError` if the request fails or is rejected.
    async fn register_service(&self, descriptor: &ServiceDescriptor) -> Result<(), BackendError>;

    /// List the services known to the backend agent, keyed by service ID.
    ///
    /// # Errors
    /// Returns `BackendError` if the request fails or the listing cannot be decoded.
    async fn list_services(&self) -> Result<HashMap<String, ServiceEntry>, BackendError>;
}

/// Factory for backend connection handles.
#[async_trait]
pub trait RegistryBackend: Send + Sync {
    /// Build a connection handle from the configured options.
    ///
    /// # Errors
    /// Returns `BackendError::InvalidOptions` for malformed options, or a
    /// transport error if the backend connects eagerly.
    async fn connect(
        &self,
        options: &ConnectionOptions,
    ) -> Result<Box<dyn RegistryConnection>, BackendError>;
}
