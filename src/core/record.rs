//! Password record model shared across the hook boundary.

use serde::{Deserialize, Serialize};

/// Optional generation metadata attached to a password.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PasswordMetadata {
    /// Password length in characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    /// Estimated entropy in bits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entropy: Option<f64>,
    /// Generation mode (e.g. "syllables", "passphrase")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Generation time, ISO-8601
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl PasswordMetadata {
    /// Set length.
    pub fn with_length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    /// Set entropy.
    pub fn with_entropy(mut self, entropy: f64) -> Self {
        self.entropy = Some(entropy);
        self
    }

    /// Set mode.
    pub fn with_mode(mut self, mode: &str) -> Self {
        self.mode = Some(mode.to_string());
        self
    }

    /// Set timestamp.
    pub fn with_timestamp(mut self, timestamp: &str) -> Self {
        self.timestamp = Some(timestamp.to_string());
        self
    }

    /// Whether no field is populated.
    pub fn is_empty(&self) -> bool {
        self.length.is_none()
            && self.entropy.is_none()
            && self.mode.is_none()
            && self.timestamp.is_none()
    }
}

/// A password plus whatever metadata travelled with it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordRecord {
    /// The secret value
    pub password: String,
    /// Generation metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PasswordMetadata>,
    /// Record-level timestamp, used when metadata carries none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Set on records produced by an import
    #[serde(default)]
    pub imported: bool,
    /// Import time, present only when `imported` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imported_at: Option<String>,
}

impl PasswordRecord {
    /// Create a record holding only a password.
    pub fn new(password: &str) -> Self {
        Self {
            password: password.to_string(),
            ..Default::default()
        }
    }

    /// Attach metadata.
    pub fn with_metadata(mut self, metadata: PasswordMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Set the record-level timestamp.
    pub fn with_timestamp(mut self, timestamp: &str) -> Self {
        self.timestamp = Some(timestamp.to_string());
        self
    }

    /// Tag as produced by an import at `at`.
    pub fn mark_imported(mut self, at: &str) -> Self {
        self.imported = true;
        self.imported_at = Some(at.to_string());
        self
    }

    /// Best timestamp for this record: metadata first, then record level.
    pub fn effective_timestamp(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.timestamp.as_deref())
            .or(self.timestamp.as_deref())
    }
}
