//! Served-model types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of telemetry model served over the northbound interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModelType {
    /// RAN intelligent controller model
    Ric,
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelType::Ric => write!(f, "RIC"),
        }
    }
}

/// Identity of a served telemetry model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_type: ModelType,
    pub version: String,
}

impl ModelInfo {
    pub fn new(model_type: ModelType, version: impl Into<String>) -> Self {
        Self {
            model_type,
            version: version.into(),
        }
    }
}

impl fmt::Display for ModelInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.model_type, self.version)
    }
}

/// A capability registered on the northbound server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "service", rename_all = "snake_case")]
pub enum ServiceDescriptor {
    /// gNMI access to a telemetry model
    Gnmi(ModelInfo),
}

impl ServiceDescriptor {
    /// The model this service exposes
    pub fn model(&self) -> &ModelInfo {
        match self {
            ServiceDescriptor::Gnmi(model) => model,
        }
    }
}

impl fmt::Display for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceDescriptor::Gnmi(model) => write!(f, "gnmi({})", model),
        }
    }
}
