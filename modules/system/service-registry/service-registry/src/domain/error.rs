//! Mapping of backend failures onto the public error taxonomy.
//!
//! The same backend failure means different things depending on the
//! operation that hit it, so the mapping is per operation.

use service_registry_sdk::ServiceRegistryError;

use crate::backend::BackendError;

/// Failure while constructing the connection handle.
pub(super) fn connect_error(err: &BackendError) -> ServiceRegistryError {
    ServiceRegistryError::connection(err.to_string())
}

/// Failure of the registration round-trip.
pub(super) fn registration_error(service_id: &str, err: BackendError) -> ServiceRegistryError {
    match err {
        BackendError::Rejected { message, .. } | BackendError::Malformed(message) => {
            ServiceRegistryError::Registration {
                service_id: service_id.to_owned(),
                message,
            }
        }
        other => ServiceRegistryError::connection(other.to_string()),
    }
}

/// Failure of the listing round-trip.
pub(super) fn lookup_error(service_id: &str, err: BackendError) -> ServiceRegistryError {
    match err {
        BackendError::Rejected { .. } | BackendError::Malformed(_) => {
            ServiceRegistryError::Lookup {
                service_id: service_id.to_owned(),
                message: err.to_string(),
            }
        }
        other => ServiceRegistryError::connection(other.to_string()),
    }
}
