//! Settings UI contract
//!
//! Provides:
//! - Host sanitization primitives
//! - The container plugins render settings into

pub mod container;
pub mod sanitize;

pub use container::{SettingsContainer, SettingsSection};
pub use sanitize::Sanitizer;
