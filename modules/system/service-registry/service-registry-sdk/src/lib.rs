#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Service Registry SDK
//!
//! This crate provides the public API for the `service-registry` module:
//!
//! - [`ServiceRegistryClient`] - Public API trait for consumers
//! - [`ServiceDescriptor`], [`ServiceAddress`] - Service models
//! - [`RegisterOutcome`], [`LookupOutcome`] - Operation results, including the
//!   non-error `Skipped` state of a disabled registry
//! - [`ServiceRegistryError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use service_registry_sdk::{LookupOutcome, ServiceRegistryClient};
//!
//! // Register this process at startup
//! registry.register().await?;
//!
//! // Resolve a peer before an outbound call
//! if let LookupOutcome::Resolved(addr) = registry.lookup("billing-1").await? {
//!     let url = format!("http://{addr}/v1/invoices");
//! }
//! ```

pub mod api;
pub mod error;
pub mod models;

pub use api::ServiceRegistryClient;
pub use error::ServiceRegistryError;
pub use models::{
    HealthCheckSpec, LookupOutcome, RegisterOutcome, ServiceAddress, ServiceDescriptor,
};
