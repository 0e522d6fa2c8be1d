//! Core error types for the KPI monitor

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A supplied credential path does not exist
    #[error("{kind} file not found: {path}")]
    CredentialMissing { kind: &'static str, path: PathBuf },

    /// Only one half of the key/certificate pair was supplied
    #[error("Key and certificate must be supplied together")]
    UnpairedCredential,
}

/// Errors raised while preparing a southbound session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The endpoint is not a usable `host:port` address
    #[error("Invalid E2T endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

/// Errors raised by the northbound server before or while serving
#[derive(Error, Debug)]
pub enum ServerError {
    /// A credential file could not be read or contained nothing usable
    #[error("Failed to load {kind} from {path}: {message}")]
    Credentials {
        kind: &'static str,
        path: PathBuf,
        message: String,
    },

    /// The TLS configuration was rejected
    #[error("TLS configuration error: {0}")]
    Tls(String),

    /// Failed to bind the listening socket
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The serve path ended without ever reporting readiness
    #[error("Northbound server exited before becoming ready")]
    ExitedBeforeReady,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
