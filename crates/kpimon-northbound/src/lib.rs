//! kpimon-northbound: Northbound API server
//!
//! Serves the registered telemetry-model services to management clients
//! over TCP, optionally wrapped in TLS, and reports readiness through a
//! one-shot callback once the listening socket is bound.

pub mod server;

pub use server::{NorthboundServer, NorthboundServerFactory};
