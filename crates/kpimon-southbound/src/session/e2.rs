//! E2T session
//!
//! Holds a connection to the E2 termination point open and re-establishes it
//! whenever it drops. Message exchange over the connection is owned by the
//! E2 application protocol layer; here the received bytes are only accounted.

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tracing::Instrument;

use kpimon_core::config::SouthboundConfig;
use kpimon_core::traits::{Session, SessionFactory};
use kpimon_core::SessionError;

use super::endpoint::Endpoint;
use super::reconnect::ExponentialBackoff;

/// Initial capacity of the per-connection read buffer
const READ_BUFFER_CAPACITY: usize = 8 * 1024;

/// Session against a single E2T endpoint
pub struct E2Session {
    /// Address as supplied by the caller
    address: String,
    /// Parsed endpoint
    endpoint: Endpoint,
    /// Connect timeout and backoff settings
    config: SouthboundConfig,
    /// Logging context for everything this session emits
    span: tracing::Span,
}

impl E2Session {
    /// Prepare a session against `address`; no connection is made yet
    pub fn new(address: &str, config: SouthboundConfig) -> Result<Self, SessionError> {
        let endpoint = Endpoint::parse(address)?;
        let span = tracing::info_span!("southbound", endpoint = %endpoint);

        Ok(Self {
            address: address.to_string(),
            endpoint,
            config,
            span,
        })
    }

    /// The parsed endpoint
    pub fn target(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn run_loop(&self) {
        let mut backoff = ExponentialBackoff::from_config(&self.config.backoff);

        loop {
            match self.connect().await {
                Ok(stream) => {
                    tracing::info!("Connected to E2T");
                    backoff.reset();

                    match drain(stream).await {
                        Ok(received) => {
                            tracing::warn!(received, "E2T closed the connection")
                        }
                        Err(e) => tracing::warn!(error = %e, "E2T connection lost"),
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to connect to E2T");
                }
            }

            let delay = backoff.next_delay();
            tracing::info!("Reconnecting in {:?}", delay);
            tokio::time::sleep(delay).await;
        }
    }

    /// Attempt a single connection, bounded by the configured timeout
    async fn connect(&self) -> io::Result<TcpStream> {
        tracing::debug!("Connecting to {}", self.endpoint);

        let stream = tokio::time::timeout(
            self.config.connect_timeout,
            TcpStream::connect((self.endpoint.host(), self.endpoint.port())),
        )
        .await
        .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "connection timed out"))??;

        stream.set_nodelay(true)?;
        Ok(stream)
    }
}

/// Read until the peer closes, returning the number of bytes received
async fn drain(mut stream: TcpStream) -> io::Result<u64> {
    let mut buf = BytesMut::with_capacity(READ_BUFFER_CAPACITY);
    let mut received = 0u64;

    loop {
        buf.clear();
        let n = stream.read_buf(&mut buf).await?;
        if n == 0 {
            return Ok(received);
        }
        received += n as u64;
        tracing::trace!(bytes = n, "Received from E2T");
    }
}

#[async_trait]
impl Session for E2Session {
    fn endpoint(&self) -> &str {
        &self.address
    }

    async fn run(&self) {
        self.run_loop().instrument(self.span.clone()).await
    }
}

/// Creates [`E2Session`]s sharing one southbound configuration
#[derive(Debug, Clone, Default)]
pub struct E2SessionFactory {
    config: SouthboundConfig,
}

impl E2SessionFactory {
    pub fn new(config: SouthboundConfig) -> Self {
        Self { config }
    }
}

impl SessionFactory for E2SessionFactory {
    fn create_session(&self, endpoint: &str) -> Result<Arc<dyn Session>, SessionError> {
        let session = E2Session::new(endpoint, self.config.clone())?;
        Ok(Arc::new(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_address() {
        let session = E2Session::new("onos-e2t:5150", SouthboundConfig::default()).unwrap();
        assert_eq!(session.endpoint(), "onos-e2t:5150");
        assert_eq!(session.target().port(), 5150);
    }

    #[test]
    fn test_factory_rejects_malformed_endpoint() {
        let factory = E2SessionFactory::default();
        let err = factory.create_session("onos-e2t").err().unwrap();
        assert!(matches!(err, SessionError::InvalidEndpoint { .. }));
    }
}
