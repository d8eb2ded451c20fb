//! XML codec settings.
//!
//! Typed view of the plugin's key/value config. Encode and decode build
//! one of these from a single snapshot at entry.

use crate::plugin::config::ConfigSnapshot;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Maximum length of a user-supplied root element name.
pub const MAX_ROOT_ELEMENT_LEN: usize = 50;

/// Root element used when none (or an unusable one) is configured.
pub const DEFAULT_ROOT_ELEMENT: &str = "passwords";

/// Declared encoding used when none (or an unusable one) is configured.
pub const DEFAULT_ENCODING: &str = "UTF-8";

const KEY_PRETTY_PRINT: &str = "prettyPrint";
const KEY_INCLUDE_METADATA: &str = "includeMetadata";
const KEY_ENCODING: &str = "encoding";
const KEY_ROOT_ELEMENT: &str = "rootElement";

/// XML codec configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct XmlCodecSettings {
    /// Indent output
    pub pretty_print: bool,
    /// Emit `<metadata>` blocks
    pub include_metadata: bool,
    /// Encoding label for the declaration; no transcoding is done
    pub encoding: String,
    /// Root element name
    pub root_element: String,
}

impl Default for XmlCodecSettings {
    fn default() -> Self {
        Self {
            pretty_print: true,
            include_metadata: true,
            encoding: DEFAULT_ENCODING.to_string(),
            root_element: DEFAULT_ROOT_ELEMENT.to_string(),
        }
    }
}

impl XmlCodecSettings {
    /// Read settings from a config snapshot, defaulting missing or
    /// mistyped keys.
    pub fn from_snapshot(values: &ConfigSnapshot) -> Self {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| {
            values.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
        };
        let text = |key: &str, default: String| {
            values
                .get(key)
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or(default)
        };

        Self {
            pretty_print: flag(KEY_PRETTY_PRINT, defaults.pretty_print),
            include_metadata: flag(KEY_INCLUDE_METADATA, defaults.include_metadata),
            encoding: text(KEY_ENCODING, defaults.encoding),
            root_element: text(KEY_ROOT_ELEMENT, defaults.root_element),
        }
    }

    /// Settings as plugin config values.
    pub fn to_values(&self) -> ConfigSnapshot {
        ConfigSnapshot::from([
            (KEY_PRETTY_PRINT.to_string(), json!(self.pretty_print)),
            (KEY_INCLUDE_METADATA.to_string(), json!(self.include_metadata)),
            (KEY_ENCODING.to_string(), json!(self.encoding)),
            (KEY_ROOT_ELEMENT.to_string(), json!(self.root_element)),
        ])
    }

    /// Configured root element, or the default if it is not a usable name.
    pub fn effective_root_element(&self) -> &str {
        if is_valid_element_name(&self.root_element) {
            &self.root_element
        } else {
            DEFAULT_ROOT_ELEMENT
        }
    }

    /// Configured encoding label, or the default if it is not a usable label.
    pub fn effective_encoding(&self) -> &str {
        if is_valid_encoding_label(&self.encoding) {
            &self.encoding
        } else {
            DEFAULT_ENCODING
        }
    }

    pub(crate) fn key_pretty_print() -> &'static str {
        KEY_PRETTY_PRINT
    }

    pub(crate) fn key_include_metadata() -> &'static str {
        KEY_INCLUDE_METADATA
    }

    pub(crate) fn key_root_element() -> &'static str {
        KEY_ROOT_ELEMENT
    }
}

/// Whether `name` can be used as an element name (no namespace prefix).
pub fn is_valid_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    let first_ok = match chars.next() {
        Some(c) => c.is_alphabetic() || c == '_',
        None => false,
    };

    first_ok
        && name.chars().count() <= MAX_ROOT_ELEMENT_LEN
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn is_valid_encoding_label(label: &str) -> bool {
    let mut chars = label.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}
