//! # genpwd-plugins - Import/export plugins for password records
//!
//! A hook-based extension point for moving password records to and from
//! text formats:
//! - **Plugin**: optional export/import/settings hooks and a registry that
//!   dispatches them in registration order
//! - **Codec**: a hardened XML codec and a JSON codec
//! - **Host**: async wrappers and configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use genpwd_plugins::codec::XmlCodecPlugin;
//! use genpwd_plugins::core::{HookOptions, PasswordRecord};
//! use genpwd_plugins::plugin::PluginRegistry;
//!
//! let mut registry = PluginRegistry::new();
//! registry.register(Box::new(XmlCodecPlugin::new())).unwrap();
//!
//! let records = vec![PasswordRecord::new("correct horse")];
//! let xml = registry
//!     .dispatch_export(&records, &HookOptions::new("xml"))
//!     .unwrap();
//! let back = registry
//!     .dispatch_import(&xml, &HookOptions::new("xml"))
//!     .unwrap();
//! assert_eq!(back[0].password, "correct horse");
//! ```

pub mod codec;
pub mod core;
pub mod host;
pub mod monitoring;
pub mod plugin;
pub mod ui;

pub use core::error::{Error, Result};
