//! Registry adapter: connection guard, registration and lookup.

use std::sync::Arc;

use service_registry_sdk::{
    LookupOutcome, RegisterOutcome, ServiceAddress, ServiceRegistryError,
};
use tokio::sync::OnceCell;

use super::error::{connect_error, lookup_error, registration_error};
use crate::backend::{RegistryBackend, RegistryConnection, ServiceEntry};
use crate::config::ServiceRegistryConfig;

/// Outcome of the connection guard.
pub enum Connection<'a> {
    /// The adapter's connection handle.
    Connected(&'a dyn RegistryConnection),
    /// Registry integration is turned off; this is not a failure.
    Disabled,
}

/// Adapter between this process and the coordination backend.
///
/// Built once by the composition root and shared by reference. The adapter
/// owns at most one connection handle, created on first use; concurrent first
/// callers wait for the same construction. No handle is ever created while the
/// configuration is inactive.
pub struct RegistryAdapter {
    config: ServiceRegistryConfig,
    backend: Arc<dyn RegistryBackend>,
    handle: OnceCell<Box<dyn RegistryConnection>>,
}

impl RegistryAdapter {
    #[must_use]
    pub fn new(config: ServiceRegistryConfig, backend: Arc<dyn RegistryBackend>) -> Self {
        Self {
            config,
            backend,
            handle: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ServiceRegistryConfig {
        &self.config
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.config.is_active()
    }

    /// Evaluate the guard and return the connection handle.
    ///
    /// A failed construction leaves no handle behind, so a later call
    /// constructs again.
    ///
    /// # Errors
    /// Returns `ServiceRegistryError::Connection` if the backend could not
    /// build a handle from the connection options.
    pub async fn connect(&self) -> Result<Connection<'_>, ServiceRegistryError> {
        if !self.config.is_active() {
            return Ok(Connection::Disabled);
        }

        let handle = self
            .handle
            .get_or_try_init(|| async {
                tracing::debug!("constructing registry connection handle");
                self.backend.connect(&self.config.connection).await
            })
            .await
            .map_err(|e| connect_error(&e))?;

        Ok(Connection::Connected(&**handle))
    }

    /// Register the configured descriptor with the backend.
    ///
    /// # Errors
    /// - `Connection` if the backend cannot be reached
    /// - `Registration` if the backend rejected the registration
    pub async fn register(&self) -> Result<RegisterOutcome, ServiceRegistryError> {
        let Connection::Connected(conn) = self.connect().await? else {
            return Ok(RegisterOutcome::Skipped);
        };

        let descriptor = &self.config.service;
        conn.register_service(descriptor)
            .await
            .map_err(|e| registration_error(&descriptor.id, e))?;

        Ok(RegisterOutcome::Registered {
            service_name: descriptor.name.clone(),
        })
    }

    /// Resolve `service_id` to the address and port it registered with.
    ///
    /// # Errors
    /// - `Connection` if the backend cannot be reached
    /// - `NotFound` if the ID is absent from the listing
    /// - `Lookup` if the listing or the entry is malformed
    pub async fn lookup(&self, service_id: &str) -> Result<LookupOutcome, ServiceRegistryError> {
        let Connection::Connected(conn) = self.connect().await? else {
            return Ok(LookupOutcome::Skipped);
        };

        let mut services = conn
            .list_services()
            .await
            .map_err(|e| lookup_error(service_id, e))?;

        let entry = services
            .remove(service_id)
            .ok_or_else(|| ServiceRegistryError::not_found(service_id))?;

        resolve_entry(service_id, entry).map(LookupOutcome::Resolved)
    }
}

fn resolve_entry(
    service_id: &str,
    entry: ServiceEntry,
) -> Result<ServiceAddress, ServiceRegistryError> {
    let malformed = |field: &str| ServiceRegistryError::Lookup {
        service_id: service_id.to_owned(),
        message: format!("listing entry has no {field}"),
    };

    let address = entry.address.ok_or_else(|| malformed("address"))?;
    let port = entry.port.ok_or_else(|| malformed("port"))?;
    Ok(ServiceAddress::new(address, port))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_entry_composes_exact_address() {
        let addr = resolve_entry("svc-1", ServiceEntry::new("10.0.0.5", 8080)).unwrap();
        assert_eq!(addr.to_string(), "10.0.0.5:8080");
    }

    #[test]
    fn test_resolve_entry_missing_address() {
        let entry = ServiceEntry {
            address: None,
            port: Some(8080),
        };
        let err = resolve_entry("svc-1", entry).unwrap_err();
        assert_eq!(
            err,
            ServiceRegistryError::Lookup {
                service_id: "svc-1".to_owned(),
                message: "listing entry has no address".to_owned(),
            }
        );
    }

    #[test]
    fn test_resolve_entry_missing_port() {
        let entry = ServiceEntry {
            address: Some("10.0.0.5".to_owned()),
            port: None,
        };
        let err = resolve_entry("svc-1", entry).unwrap_err();
        assert!(matches!(err, ServiceRegistryError::Lookup { .. }));
        assert!(!err.to_string().contains("undefined"));
    }
}
