//! Public API trait for the service registry.

use async_trait::async_trait;

use crate::error::ServiceRegistryError;
use crate::models::{LookupOutcome, RegisterOutcome};

/// Public API trait for the service registry.
///
/// Implementations are constructed once by the composition root and shared
/// by reference (usually `Arc<dyn ServiceRegistryClient>`) with everything
/// that needs registry access.
///
/// A disabled registry is not a failure: both operations return their
/// `Skipped` variant without touching the backend.
#[async_trait]
pub trait ServiceRegistryClient: Send + Sync {
    /// Register this process's own service descriptor with the backend.
    ///
    /// Issues exactly one registration request and resolves once the backend
    /// acknowledged or failed it. Never retries.
    ///
    /// # Errors
    ///
    /// - `Connection` if the backend cannot be reached or is misconfigured
    /// - `Registration` if the backend rejected the registration
    async fn register(&self) -> Result<RegisterOutcome, ServiceRegistryError>;

    /// Resolve a registered service instance to a dialable `host:port`.
    ///
    /// The backend is queried on every call; results are never cached.
    ///
    /// # Errors
    ///
    /// - `Connection` if the backend cannot be reached or timed out
    /// - `NotFound` if `service_id` is absent from the listing
    /// - `Lookup` if the listing or the entry is malformed
    async fn lookup(&self, service_id: &str) -> Result<LookupOutcome, ServiceRegistryError>;
}
