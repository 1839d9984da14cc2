//! Wire types of the Consul agent HTTP API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use service_registry_sdk::{HealthCheckSpec, ServiceDescriptor};

use crate::backend::ServiceEntry;

/// Body of `PUT /v1/agent/service/register`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AgentServiceRegistration<'a> {
    #[serde(rename = "ID")]
    pub id: &'a str,
    pub name: &'a str,
    pub address: &'a str,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<&'a BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check: Option<&'a HealthCheckSpec>,
}

impl<'a> From<&'a ServiceDescriptor> for AgentServiceRegistration<'a> {
    fn from(d: &'a ServiceDescriptor) -> Self {
        Self {
            id: &d.id,
            name: &d.name,
            address: &d.address,
            port: d.port,
            tags: (!d.tags.is_empty()).then_some(d.tags.as_slice()),
            meta: (!d.meta.is_empty()).then_some(&d.meta),
            check: (!d.check.is_empty()).then_some(&d.check),
        }
    }
}

/// One value of the `GET /v1/agent/services` object.
///
/// Only the fields needed to dial the instance are decoded.
#[derive(Debug, Deserialize)]
pub struct AgentService {
    #[serde(rename = "Address", default)]
    pub address: Option<String>,
    #[serde(rename = "Port", default)]
    pub port: Option<u16>,
}

impl From<AgentService> for ServiceEntry {
    fn from(s: AgentService) -> Self {
        Self {
            address: s.address,
            port: s.port,
        }
    }
}
