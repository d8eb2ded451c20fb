//! Monitoring Module
//!
//! Provides structured logging setup on top of `tracing`.

pub mod logging;

pub use logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
