//! Northbound server configuration

use std::path::PathBuf;

use super::manager::{ManagerConfig, SecurityConfig};

/// Everything a server factory needs to build a northbound server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub ca_path: Option<PathBuf>,
    pub key_path: Option<PathBuf>,
    pub cert_path: Option<PathBuf>,
    pub port: u16,
    /// When set, client certificates are not demanded
    pub insecure: bool,
    pub security: SecurityConfig,
}

impl ServerConfig {
    /// Build a server config from the manager's settings
    pub fn from_manager(config: &ManagerConfig, insecure: bool) -> Self {
        Self {
            ca_path: config.ca_path.clone(),
            key_path: config.key_path.clone(),
            cert_path: config.cert_path.clone(),
            port: config.grpc_port,
            insecure,
            security: config.security,
        }
    }

    /// Listening address for all interfaces
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
