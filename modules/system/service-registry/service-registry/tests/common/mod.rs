#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use service_registry::{
    BackendError, ConnectionOptions, RegistryAdapter, RegistryBackend, RegistryConnection,
    ServiceEntry, ServiceRegistryConfig,
};
use service_registry_sdk::ServiceDescriptor;

/// How the fake backend answers registration requests.
#[derive(Clone)]
pub enum RegisterBehavior {
    Accept,
    Reject(String),
    Unreachable,
}

/// How the fake backend answers listing requests.
#[derive(Clone)]
pub enum ListBehavior {
    Services(HashMap<String, ServiceEntry>),
    Malformed,
    Unreachable,
}

/// Counters shared between the fake backend and every handle it builds.
#[derive(Default)]
pub struct Calls {
    pub connects: AtomicUsize,
    pub registers: AtomicUsize,
    pub lists: AtomicUsize,
    pub registered: Mutex<Vec<ServiceDescriptor>>,
}

impl Calls {
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn registers(&self) -> usize {
        self.registers.load(Ordering::SeqCst)
    }

    pub fn lists(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    pub fn total_backend_calls(&self) -> usize {
        self.connects() + self.registers() + self.lists()
    }
}

/// In-memory backend recording every call it receives.
pub struct RecordingBackend {
    pub calls: Arc<Calls>,
    register: RegisterBehavior,
    list: ListBehavior,
    fail_connect: bool,
    connect_delay: Duration,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Calls::default()),
            register: RegisterBehavior::Accept,
            list: ListBehavior::Services(HashMap::new()),
            fail_connect: false,
            connect_delay: Duration::ZERO,
        }
    }

    pub fn with_register(mut self, behavior: RegisterBehavior) -> Self {
        self.register = behavior;
        self
    }

    pub fn with_services(mut self, services: &[(&str, ServiceEntry)]) -> Self {
        self.list = ListBehavior::Services(
            services
                .iter()
                .map(|(id, entry)| ((*id).to_owned(), entry.clone()))
                .collect(),
        );
        self
    }

    pub fn with_list(mut self, behavior: ListBehavior) -> Self {
        self.list = behavior;
        self
    }

    pub fn failing_connect(mut self) -> Self {
        self.fail_connect = true;
        self
    }

    /// Slow down handle construction so concurrent first callers overlap.
    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = delay;
        self
    }
}

#[async_trait]
impl RegistryBackend for RecordingBackend {
    async fn connect(
        &self,
        _options: &ConnectionOptions,
    ) -> Result<Box<dyn RegistryConnection>, BackendError> {
        self.calls.connects.fetch_add(1, Ordering::SeqCst);
        if !self.connect_delay.is_zero() {
            tokio::time::sleep(self.connect_delay).await;
        }
        if self.fail_connect {
            return Err(BackendError::InvalidOptions("unsupported option 'bogus'".to_owned()));
        }
        Ok(Box::new(RecordingConnection {
            calls: Arc::clone(&self.calls),
            register: self.register.clone(),
            list: self.list.clone(),
        }))
    }
}

struct RecordingConnection {
    calls: Arc<Calls>,
    register: RegisterBehavior,
    list: ListBehavior,
}

#[async_trait]
impl RegistryConnection for RecordingConnection {
    async fn register_service(&self, descriptor: &ServiceDescriptor) -> Result<(), BackendError> {
        self.calls.registers.fetch_add(1, Ordering::SeqCst);
        self.calls
            .registered
            .lock()
            .unwrap()
            .push(descriptor.clone());
        tokio::task::yield_now().await;
        match &self.register {
            RegisterBehavior::Accept => Ok(()),
            RegisterBehavior::Reject(message) => Err(BackendError::Rejected {
                status: 500,
                message: message.clone(),
            }),
            RegisterBehavior::Unreachable => {
                Err(BackendError::Unreachable("connection refused".into()))
            }
        }
    }

    async fn list_services(&self) -> Result<HashMap<String, ServiceEntry>, BackendError> {
        self.calls.lists.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        match &self.list {
            ListBehavior::Services(services) => Ok(services.clone()),
            ListBehavior::Malformed => Err(BackendError::Malformed(
                "expected object at line 1 column 1".to_owned(),
            )),
            ListBehavior::Unreachable => {
                Err(BackendError::Unreachable("connection refused".into()))
            }
        }
    }
}

pub fn orders_descriptor() -> ServiceDescriptor {
    ServiceDescriptor {
        id: "svc-1".to_owned(),
        name: "orders".to_owned(),
        address: "10.0.0.5".to_owned(),
        port: 8080,
        ..ServiceDescriptor::default()
    }
}

pub fn enabled_config() -> ServiceRegistryConfig {
    let mut connection = ConnectionOptions::new();
    connection.insert("host".to_owned(), json!("127.0.0.1"));
    connection.insert("port".to_owned(), json!(8500));
    ServiceRegistryConfig {
        enabled: true,
        connection,
        service: orders_descriptor(),
    }
}

pub fn adapter_with(config: ServiceRegistryConfig, backend: RecordingBackend) -> (RegistryAdapter, Arc<Calls>) {
    let calls = Arc::clone(&backend.calls);
    (RegistryAdapter::new(config, Arc::new(backend)), calls)
}
