//! Northbound server traits

use async_trait::async_trait;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::types::ServiceDescriptor;

/// Invoked by the serving path once the server is reachable, with the bound address.
///
/// Being `FnOnce`, it cannot fire twice.
pub type ReadyCallback = Box<dyn FnOnce(String) + Send + 'static>;

/// Abstraction over a configurable, servable network endpoint
#[async_trait]
pub trait Server: Send {
    /// Register a served capability
    fn add_service(&mut self, service: ServiceDescriptor);

    /// Serve until terminated.
    ///
    /// `on_ready` must be called when the transport becomes reachable. An
    /// error returned before that point is a startup failure.
    async fn serve(self: Box<Self>, on_ready: ReadyCallback) -> Result<(), ServerError>;
}

/// Builds northbound servers
pub trait ServerFactory: Send + Sync {
    fn create_server(&self, config: ServerConfig) -> Box<dyn Server>;
}
