//! Plugin Module
//!
//! Provides the import/export extension contract:
//! - Plugin interface with optional hooks
//! - Plugin registry and hook dispatch
//! - Shared runtime configuration

pub mod config;
pub mod interface;
pub mod registry;

pub use config::{ConfigSnapshot, PluginConfig};
pub use interface::{Plugin, PluginError, PluginHook, PluginInfo, PluginResult};
pub use registry::{PluginRegistry, PluginStatus, RegisteredPlugin};
