//! Local (in-process) client for the service registry module.

use std::sync::Arc;

use async_trait::async_trait;
use service_registry_sdk::{
    LookupOutcome, RegisterOutcome, ServiceRegistryClient, ServiceRegistryError,
};

use super::RegistryAdapter;

/// Crate name and version reported with every registry log event.
const COMPONENT: &str = concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION"));

/// Local client wrapping the registry adapter.
///
/// The adapter only returns typed outcomes; this wrapper is where they are
/// turned into log events before being handed back unchanged.
pub struct ServiceRegistryLocalClient {
    adapter: Arc<RegistryAdapter>,
}

impl ServiceRegistryLocalClient {
    #[must_use]
    pub fn new(adapter: Arc<RegistryAdapter>) -> Self {
        Self { adapter }
    }
}

fn log_and_return(op: &str, e: ServiceRegistryError) -> ServiceRegistryError {
    tracing::error!(operation = op, component = COMPONENT, error = %e, "service-registry call failed");
    e
}

#[async_trait]
impl ServiceRegistryClient for ServiceRegistryLocalClient {
    async fn register(&self) -> Result<RegisterOutcome, ServiceRegistryError> {
        let outcome = self
            .adapter
            .register()
            .await
            .map_err(|e| log_and_return("register", e))?;

        match &outcome {
            RegisterOutcome::Registered { service_name } => tracing::info!(
                component = COMPONENT,
                service = %service_name,
                service_id = %self.adapter.config().service.id,
                "service registered with registry"
            ),
            RegisterOutcome::Skipped => tracing::info!(
                component = COMPONENT,
                "service registry disabled, registration skipped"
            ),
        }
        Ok(outcome)
    }

    async fn lookup(&self, service_id: &str) -> Result<LookupOutcome, ServiceRegistryError> {
        let outcome = self
            .adapter
            .lookup(service_id)
            .await
            .map_err(|e| log_and_return("lookup", e))?;

        match &outcome {
            LookupOutcome::Resolved(addr) => tracing::debug!(
                component = COMPONENT,
                service_id,
                address = %addr,
                "resolved service address"
            ),
            LookupOutcome::Skipped => tracing::debug!(
                component = COMPONENT,
                service_id,
                "service registry disabled, lookup skipped"
            ),
        }
        Ok(outcome)
    }
}
