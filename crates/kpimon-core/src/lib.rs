//! kpimon-core: Core abstractions and configuration for the KPI monitor
//!
//! This crate provides the configuration structures, error taxonomy,
//! collaborator traits and served-model types shared by the manager,
//! the northbound server and the southbound E2 session.

pub mod config;
pub mod error;
pub mod nbi;
pub mod traits;
pub mod types;

pub use error::{ConfigError, ServerError, SessionError};
pub use types::{ModelInfo, ModelType, ServiceDescriptor};
