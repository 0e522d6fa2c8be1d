//! KPI monitor daemon
//!
//! Brings up the northbound API server and the southbound E2T session,
//! then stays alive until it is told to stop.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kpimon_core::config::{self, ManagerConfig};
use kpimon_manager::Manager;
use kpimon_northbound::NorthboundServerFactory;
use kpimon_southbound::E2SessionFactory;

#[derive(Parser)]
#[command(name = "kpimon")]
#[command(about = "KPI monitor for E2 nodes")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to CA certificate
    #[arg(long)]
    ca_path: Option<PathBuf>,

    /// Path to private key
    #[arg(long)]
    key_path: Option<PathBuf>,

    /// Path to certificate
    #[arg(long)]
    cert_path: Option<PathBuf>,

    /// E2T service endpoint
    #[arg(long)]
    e2t_endpoint: Option<String>,

    /// Northbound listening port
    #[arg(long)]
    grpc_port: Option<u16>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// Layer command-line overrides on top of the file configuration
    fn apply(self, mut config: ManagerConfig) -> ManagerConfig {
        if self.ca_path.is_some() {
            config.ca_path = self.ca_path;
        }
        if self.key_path.is_some() {
            config.key_path = self.key_path;
        }
        if self.cert_path.is_some() {
            config.cert_path = self.cert_path;
        }
        if let Some(endpoint) = self.e2t_endpoint {
            config.e2t_endpoint = endpoint;
        }
        if let Some(port) = self.grpc_port {
            config.grpc_port = port;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| args.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let file_config = if let Some(config_path) = &args.config {
        config::load_config(config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        let default_path = config::default_config_path();
        if default_path.exists() {
            config::load_config(&default_path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {:?}: {}", default_path, e);
                ManagerConfig::default()
            })
        } else {
            ManagerConfig::default()
        }
    };
    let config = args.apply(file_config);

    config
        .cert_paths()
        .validate()
        .context("Invalid credential paths")?;
    config
        .southbound
        .validate()
        .context("Invalid southbound configuration")?;

    tracing::info!("Starting onos-kpimon");

    let sessions = E2SessionFactory::new(config.southbound.clone());
    let manager = Manager::new(config, &sessions, Arc::new(NorthboundServerFactory))
        .context("Failed to create Manager")?;
    manager.run().await;

    wait_for_shutdown().await?;
    manager.close();

    Ok(())
}

/// Block until Ctrl+C or SIGTERM
async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        let mut terminate =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .context("Failed to install SIGTERM handler")?;

        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.context("Failed to listen for Ctrl+C")?;
                tracing::info!("Received Ctrl+C, shutting down");
            }
            _ = terminate.recv() => {
                tracing::info!("Received SIGTERM, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl+C")?;
        tracing::info!("Received Ctrl+C, shutting down");
    }

    Ok(())
}
