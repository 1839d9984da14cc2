#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Service Registry Module
//!
//! Registers the calling process with a Consul-like coordination backend and
//! resolves other registered instances to a dialable `host:port`.
//!
//! - [`RegistryAdapter`] - connection guard, registration and lookup
//! - [`ServiceRegistryLocalClient`] - `ServiceRegistryClient` implementation
//!   that logs every outcome
//! - [`backend`] - the seam between the adapter and a concrete backend
//! - [`consul`] - Consul agent HTTP API backend
//!
//! ```ignore
//! let adapter = Arc::new(RegistryAdapter::new(config, Arc::new(ConsulBackend)));
//! let registry: Arc<dyn ServiceRegistryClient> =
//!     Arc::new(ServiceRegistryLocalClient::new(adapter));
//! ```

pub mod backend;
pub mod config;
pub mod consul;
pub mod domain;

pub use backend::{BackendError, RegistryBackend, RegistryConnection, ServiceEntry};
pub use config::{ConfigError, ConnectionOptions, ServiceRegistryConfig};
pub use consul::{ConsulBackend, ConsulConnection, ConsulOptions};
pub use domain::{Connection, RegistryAdapter, ServiceRegistryLocalClient};
