//! Codec Module
//!
//! Concrete import/export plugins:
//! - XML codec with hardened decode and a settings panel
//! - JSON codec

pub mod json;
pub mod xml;

pub use json::JsonCodecPlugin;
pub use xml::{XmlCodecPlugin, XmlCodecSettings, XmlSettingsPanel};

use crate::core::{Error, Result};

/// Largest import accepted by any codec, in bytes (5 MiB).
pub const MAX_IMPORT_BYTES: usize = 5 * 1024 * 1024;

/// Reject input over [`MAX_IMPORT_BYTES`] before any parsing happens.
pub fn ensure_within_limit(text: &str) -> Result<()> {
    if text.len() > MAX_IMPORT_BYTES {
        return Err(Error::OversizedInput {
            size: text.len(),
            limit: MAX_IMPORT_BYTES,
        });
    }
    Ok(())
}
