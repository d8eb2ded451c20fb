//! Host configuration.
//!
//! Loaded from JSON; every section is optional and defaulted.

use crate::codec::xml::XmlCodecSettings;
use crate::core::{Error, Result};
use crate::monitoring::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level host configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Logging setup
    pub logging: LoggingConfig,
    /// Initial XML codec settings
    pub xml: XmlCodecSettings,
    /// Register the JSON codec alongside the XML one
    pub enable_json: bool,
}

impl HostConfig {
    /// Parse from a JSON string.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Configuration(e.to_string()))
    }

    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
