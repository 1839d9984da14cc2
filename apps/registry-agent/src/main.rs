#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod config;
mod logging;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use service_registry::{
    Connection, ConsulBackend, RegistryAdapter, ServiceRegistryLocalClient,
};
use service_registry_sdk::{LookupOutcome, RegisterOutcome, ServiceRegistryClient};

use crate::config::AgentConfig;

/// Registry Agent - registers this host's service with a Consul agent and resolves peers
#[derive(Parser)]
#[command(name = "registry-agent")]
#[command(about = "Registry Agent - registers a service with a Consul agent and resolves peers")]
#[command(version)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register the configured service (default)
    Register,
    /// Resolve a registered service ID to host:port
    Lookup {
        /// Service instance ID as registered with the agent
        service_id: String,
    },
    /// Validate configuration and connection options, then exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.config.as_deref()
        && !Path::new(path).is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    let config = AgentConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    logging::init(&config.logging, cli.verbose, cli.log_json);

    config
        .registry
        .validate()
        .context("invalid registry configuration")?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config.redacted())?);
        return Ok(());
    }

    tracing::info!(enabled = config.registry.is_active(), "registry agent starting");

    // Composition root: one adapter for the whole process.
    let adapter = Arc::new(RegistryAdapter::new(
        config.registry,
        Arc::new(ConsulBackend),
    ));
    let registry: Arc<dyn ServiceRegistryClient> =
        Arc::new(ServiceRegistryLocalClient::new(Arc::clone(&adapter)));

    match cli.command.unwrap_or(Commands::Register) {
        Commands::Register => register(registry.as_ref()).await,
        Commands::Lookup { service_id } => lookup(registry.as_ref(), &service_id).await,
        Commands::Check => check(&adapter).await,
    }
}

async fn register(registry: &dyn ServiceRegistryClient) -> Result<()> {
    match registry.register().await? {
        RegisterOutcome::Registered { service_name } => println!("registered {service_name}"),
        RegisterOutcome::Skipped => println!("skipped: service registry disabled"),
    }
    Ok(())
}

async fn lookup(registry: &dyn ServiceRegistryClient, service_id: &str) -> Result<()> {
    match registry.lookup(service_id).await? {
        LookupOutcome::Resolved(addr) => println!("{addr}"),
        LookupOutcome::Skipped => println!("skipped: service registry disabled"),
    }
    Ok(())
}

async fn check(adapter: &RegistryAdapter) -> Result<()> {
    match adapter.connect().await? {
        Connection::Connected(_) => println!("configuration OK (registry enabled)"),
        Connection::Disabled => println!("configuration OK (registry disabled)"),
    }
    Ok(())
}
