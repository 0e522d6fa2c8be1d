//! Northbound request protocol
//!
//! Newline-delimited JSON messages exchanged between management clients
//! and the northbound server. Every request line gets exactly one response line.

use serde::{Deserialize, Serialize};

use crate::types::{ModelInfo, ModelType, ServiceDescriptor};

/// Request from a northbound client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NbiRequest {
    /// Ping (for keepalive)
    Ping,

    /// List registered services
    ListServices,

    /// Look up the served model of a given kind
    GetModel { model_type: ModelType },
}

/// Response from the northbound server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NbiResponse {
    /// Pong (response to ping)
    Pong,

    /// Registered services
    Services { services: Vec<ServiceDescriptor> },

    /// A served model
    Model(ModelInfo),

    /// Error response
    Error { message: String },
}
