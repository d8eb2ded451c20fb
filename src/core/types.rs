//! Common types used across the crate.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

/// Timestamp wrapper for consistent serialization.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Get current UTC timestamp.
pub fn now() -> Timestamp {
    chrono::Utc::now()
}

/// Current time as ISO-8601 text with millisecond precision and a `Z` suffix.
pub fn now_iso() -> String {
    now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Options passed alongside every export/import dispatch.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HookOptions {
    /// Requested format (e.g. `"xml"`)
    pub format: String,
}

impl HookOptions {
    /// Create options for a format.
    pub fn new(format: &str) -> Self {
        Self {
            format: format.to_string(),
        }
    }

    /// Whether the requested format matches, ignoring ASCII case.
    pub fn is_format(&self, format: &str) -> bool {
        self.format.eq_ignore_ascii_case(format)
    }
}
