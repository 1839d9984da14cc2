//! Domain layer for the service registry.

pub mod adapter;
mod error;
pub mod local_client;

pub use adapter::{Connection, RegistryAdapter};
pub use local_client::ServiceRegistryLocalClient;
