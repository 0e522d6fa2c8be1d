//! Northbound server implementation

mod handler;
mod listener;
mod tls;

pub use listener::{NorthboundServer, NorthboundServerFactory};
