use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderValue};
use http::{Method, Request, StatusCode, Uri};
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use secrecy::ExposeSecret;
use service_registry_sdk::ServiceDescriptor;

use super::dto::{AgentService, AgentServiceRegistration};
use super::options::ConsulOptions;
use crate::backend::{BackendError, RegistryBackend, RegistryConnection, ServiceEntry};
use crate::config::ConnectionOptions;

const REGISTER_PATH: &str = "/v1/agent/service/register";
const SERVICES_PATH: &str = "/v1/agent/services";
const TOKEN_HEADER: &str = "x-consul-token";

type HttpsClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Backend that talks to a Consul agent over its HTTP API.
///
/// Connecting is lazy: building a [`ConsulConnection`] validates the options
/// and prepares the client, but no request is sent until the first call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsulBackend;

#[async_trait]
impl RegistryBackend for ConsulBackend {
    async fn connect(
        &self,
        options: &ConnectionOptions,
    ) -> Result<Box<dyn RegistryConnection>, BackendError> {
        let options = ConsulOptions::from_map(options)?;
        Ok(Box::new(ConsulConnection::new(&options)?))
    }
}

/// Connection handle to a single Consul agent.
pub struct ConsulConnection {
    client: HttpsClient,
    base_url: String,
    token: Option<HeaderValue>,
    timeout: Duration,
}

impl std::fmt::Debug for ConsulConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsulConnection")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ConsulConnection {
    /// Build a connection handle from typed options.
    ///
    /// # Errors
    /// Returns `BackendError::InvalidOptions` if the agent URL or the token
    /// cannot be used in a request, or TLS cannot be set up.
    pub fn new(options: &ConsulOptions) -> Result<Self, BackendError> {
        let base_url = options.base_url();
        base_url
            .parse::<Uri>()
            .map_err(|e| BackendError::InvalidOptions(format!("invalid agent URL '{base_url}': {e}")))?;

        let token = options
            .token
            .as_ref()
            .map(|t| {
                HeaderValue::from_str(t.expose_secret()).map(|mut v| {
                    v.set_sensitive(true);
                    v
                })
            })
            .transpose()
            .map_err(|_| BackendError::InvalidOptions("token is not a valid header value".to_owned()))?;

        let provider = rustls::crypto::CryptoProvider::get_default()
            .cloned()
            .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()));
        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(provider)
            .map_err(|e| BackendError::InvalidOptions(format!("TLS setup failed: {e}")))?
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);

        tracing::debug!(base_url = %base_url, "consul client prepared");

        Ok(Self {
            client,
            base_url,
            token,
            timeout: options.timeout(),
        })
    }

    /// Send one request and collect the whole response body within the deadline.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Bytes,
    ) -> Result<(StatusCode, Bytes), BackendError> {
        let mut builder = Request::builder()
            .method(method)
            .uri(format!("{}{path}", self.base_url))
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = &self.token {
            builder = builder.header(TOKEN_HEADER, token.clone());
        }
        let request = builder
            .body(Full::new(body))
            .map_err(|e| BackendError::InvalidOptions(e.to_string()))?;

        let exchange = async {
            let response = self
                .client
                .request(request)
                .await
                .map_err(|e| BackendError::Unreachable(Box::new(e)))?;
            let status = response.status();
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e: hyper::Error| BackendError::Unreachable(Box::new(e)))?
                .to_bytes();
            Ok::<_, BackendError>((status, body))
        };

        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| BackendError::Timeout(self.timeout))?
    }
}

/// A listing entry that does not decode is kept as an empty entry, so one bad
/// entry only affects lookups of its own ID.
fn decode_entry(raw: serde_json::Value) -> ServiceEntry {
    serde_json::from_value::<AgentService>(raw)
        .map(ServiceEntry::from)
        .unwrap_or_default()
}

fn rejected(status: StatusCode, body: &[u8]) -> BackendError {
    BackendError::Rejected {
        status: status.as_u16(),
        message: String::from_utf8_lossy(body).trim().to_owned(),
    }
}

#[async_trait]
impl RegistryConnection for ConsulConnection {
    async fn register_service(&self, descriptor: &ServiceDescriptor) -> Result<(), BackendError> {
        let payload = serde_json::to_vec(&AgentServiceRegistration::from(descriptor))
            .map_err(|e| BackendError::Malformed(e.to_string()))?;

        let (status, body) = self.send(Method::PUT, REGISTER_PATH, payload.into()).await?;
        if !status.is_success() {
            return Err(rejected(status, &body));
        }
        Ok(())
    }

    async fn list_services(&self) -> Result<HashMap<String, ServiceEntry>, BackendError> {
        let (status, body) = self.send(Method::GET, SERVICES_PATH, Bytes::new()).await?;
        if !status.is_success() {
            return Err(rejected(status, &body));
        }

        let services: HashMap<String, serde_json::Value> = serde_json::from_slice(&body)
            .map_err(|e| BackendError::Malformed(format!("service listing: {e}")))?;
        Ok(services
            .into_iter()
            .map(|(id, raw)| (id, decode_entry(raw)))
            .collect())
    }
}
