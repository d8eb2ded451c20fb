//! JSON codec plugin.
//!
//! Export writes a pretty-printed array of records. Import accepts that
//! array (or an object with a `passwords` array), skipping entries that
//! are not records with a non-empty password.

use crate::codec::ensure_within_limit;
use crate::core::{now_iso, Error, HookOptions, PasswordRecord, Result};
use crate::plugin::{Plugin, PluginHook, PluginInfo};
use tracing::{debug, warn};

/// Format name this plugin claims.
pub const JSON_FORMAT: &str = "json";

/// JSON import/export plugin.
pub struct JsonCodecPlugin {
    info: PluginInfo,
}

impl JsonCodecPlugin {
    /// Create the plugin.
    pub fn new() -> Self {
        Self {
            info: PluginInfo::new("json-export", env!("CARGO_PKG_VERSION"))
                .with_description("Export and import passwords as JSON")
                .with_author("GenPwd"),
        }
    }

    /// Encode records as a JSON array.
    pub fn encode(&self, records: &[PasswordRecord]) -> Result<String> {
        Ok(serde_json::to_string_pretty(records)?)
    }

    /// Decode a JSON document.
    pub fn decode(&self, text: &str) -> Result<Vec<PasswordRecord>> {
        ensure_within_limit(text)?;

        let document: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| Error::MalformedDocument(e.to_string()))?;

        let entries = match document {
            serde_json::Value::Array(entries) => entries,
            serde_json::Value::Object(mut object) => match object.remove("passwords") {
                Some(serde_json::Value::Array(entries)) => entries,
                _ => {
                    return Err(Error::MalformedDocument(
                        "expected a \"passwords\" array".to_string(),
                    ))
                }
            },
            _ => {
                return Err(Error::MalformedDocument(
                    "expected an array of records".to_string(),
                ))
            }
        };

        let imported_at = now_iso();
        let records = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                match serde_json::from_value::<PasswordRecord>(entry) {
                    Ok(record) if !record.password.trim().is_empty() => Some(record),
                    _ => {
                        debug!(entry = index + 1, "Skipping JSON entry without a password");
                        None
                    }
                }
            })
            .map(|mut record| {
                record.password = record.password.trim().to_string();
                record.mark_imported(&imported_at)
            })
            .collect();

        Ok(records)
    }
}

impl Default for JsonCodecPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for JsonCodecPlugin {
    fn info(&self) -> PluginInfo {
        self.info.clone()
    }

    fn hooks(&self) -> Vec<PluginHook> {
        vec![PluginHook::Export, PluginHook::Import]
    }

    fn on_export(&self, records: &[PasswordRecord], options: &HookOptions) -> Option<String> {
        if !options.is_format(JSON_FORMAT) {
            return None;
        }
        self.encode(records)
            .map_err(|e| warn!(error = %e, "JSON export failed"))
            .ok()
    }

    fn on_import(&self, text: &str, options: &HookOptions) -> Option<Vec<PasswordRecord>> {
        if !options.is_format(JSON_FORMAT) {
            return None;
        }
        self.decode(text)
            .map_err(|e| warn!(error = %e, "JSON import rejected"))
            .ok()
    }
}
