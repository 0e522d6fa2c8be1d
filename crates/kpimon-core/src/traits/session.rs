//! Southbound session traits

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::SessionError;

/// Abstraction over a long-lived connection to a remote termination point
#[async_trait]
pub trait Session: Send + Sync {
    /// Endpoint this session talks to
    fn endpoint(&self) -> &str;

    /// Run the session loop.
    ///
    /// Does not return during normal operation. Reconnection and any other
    /// supervision happen inside the implementation.
    async fn run(&self);
}

/// Creates sessions against an endpoint address
pub trait SessionFactory: Send + Sync {
    /// Prepare a session for `endpoint`; fails when the endpoint is unusable
    fn create_session(&self, endpoint: &str) -> Result<Arc<dyn Session>, SessionError>;
}
