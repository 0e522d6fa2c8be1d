//! Northbound server listener
//!
//! Binds the NBI port, reports readiness, then accepts clients and spawns
//! a handler for each one.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::{TcpListener, TcpStream};
use tokio_rustls::TlsAcceptor;
use tracing::Instrument;

use kpimon_core::config::ServerConfig;
use kpimon_core::traits::{ReadyCallback, Server, ServerFactory};
use kpimon_core::{ServerError, ServiceDescriptor};

use super::handler::handle_client;
use super::tls::build_acceptor;

/// Northbound API server
pub struct NorthboundServer {
    /// Server configuration
    config: ServerConfig,
    /// Registered services
    services: Vec<ServiceDescriptor>,
    /// Logging context for the serve loop and its clients
    span: tracing::Span,
}

impl NorthboundServer {
    /// Create a new server; nothing is bound until [`Server::serve`]
    pub fn new(config: ServerConfig) -> Self {
        let span = tracing::info_span!("northbound", port = config.port);
        Self {
            config,
            services: Vec::new(),
            span,
        }
    }

    /// Services registered so far
    pub fn services(&self) -> &[ServiceDescriptor] {
        &self.services
    }

    async fn serve_inner(self, on_ready: ReadyCallback) -> Result<(), ServerError> {
        let acceptor = build_acceptor(&self.config)?;

        let address = self.config.bind_address();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| ServerError::Bind {
                address: address.clone(),
                source,
            })?;
        let local_addr = listener.local_addr()?;

        tracing::info!(
            address = %local_addr,
            tls = acceptor.is_some(),
            insecure = self.config.insecure,
            authentication = self.config.security.authentication_enabled,
            authorization = self.config.security.authorization_enabled,
            services = self.services.len(),
            "Northbound server listening"
        );
        on_ready(local_addr.to_string());

        let services: Arc<[ServiceDescriptor]> = self.services.into();
        loop {
            match listener.accept().await {
                Ok((socket, peer_addr)) => {
                    spawn_client(socket, peer_addr, acceptor.clone(), Arc::clone(&services));
                }
                Err(e) => {
                    tracing::error!("Failed to accept connection: {}", e);
                }
            }
        }
    }
}

/// Handle a new client on its own task
fn spawn_client(
    socket: TcpStream,
    peer_addr: SocketAddr,
    acceptor: Option<TlsAcceptor>,
    services: Arc<[ServiceDescriptor]>,
) {
    tracing::debug!("New connection from {}", peer_addr);

    let task = async move {
        let result = match acceptor {
            Some(acceptor) => match acceptor.accept(socket).await {
                Ok(stream) => handle_client(stream, &services).await,
                Err(e) => {
                    tracing::warn!("TLS handshake with {} failed: {}", peer_addr, e);
                    return;
                }
            },
            None => handle_client(socket, &services).await,
        };

        match result {
            Ok(()) => tracing::debug!("Connection from {} closed normally", peer_addr),
            Err(e) => tracing::warn!("Connection from {} closed with error: {}", peer_addr, e),
        }
    };

    tokio::spawn(task.in_current_span());
}

#[async_trait]
impl Server for NorthboundServer {
    fn add_service(&mut self, service: ServiceDescriptor) {
        tracing::debug!(parent: &self.span, %service, "Registered service");
        self.services.push(service);
    }

    async fn serve(self: Box<Self>, on_ready: ReadyCallback) -> Result<(), ServerError> {
        let span = self.span.clone();
        (*self).serve_inner(on_ready).instrument(span).await
    }
}

/// Builds [`NorthboundServer`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct NorthboundServerFactory;

impl ServerFactory for NorthboundServerFactory {
    fn create_server(&self, config: ServerConfig) -> Box<dyn Server> {
        Box::new(NorthboundServer::new(config))
    }
}
