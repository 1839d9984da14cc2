//! Error types for the service registry module.

use thiserror::Error;

/// Errors that can occur when using the service registry API.
///
/// Every variant is a distinct cause callers can branch on to decide their
/// own retry policy. A disabled registry is never reported as an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceRegistryError {
    /// The backend is unreachable, timed out, or the connection options are invalid.
    #[error("registry connection failed: {message}")]
    Connection {
        /// Backend or transport diagnostic.
        message: String,
    },

    /// The backend rejected or failed the registration call.
    #[error("registration of service '{service_id}' failed: {message}")]
    Registration {
        /// ID of the descriptor that was being registered.
        service_id: String,
        /// Message reported by the backend.
        message: String,
    },

    /// The queried service ID is absent from the backend listing.
    #[error("service not found: {service_id}")]
    NotFound {
        /// The service ID that was not found.
        service_id: String,
    },

    /// The listing or the listed entry is malformed.
    #[error("lookup of service '{service_id}' failed: {message}")]
    Lookup {
        /// The service ID that was queried.
        service_id: String,
        /// What was wrong with the backend response.
        message: String,
    },
}

impl ServiceRegistryError {
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(service_id: impl Into<String>) -> Self {
        Self::NotFound {
            service_id: service_id.into(),
        }
    }
}
