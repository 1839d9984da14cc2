//! Consul agent HTTP API backend.

mod client;
pub mod dto;
mod options;

pub use client::{ConsulBackend, ConsulConnection};
pub use options::ConsulOptions;
