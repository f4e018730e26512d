//! Ports (driven interfaces) implemented by adapters and sinks.

pub mod logger;
pub mod provider;
