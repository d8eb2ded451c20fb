//! Runtime-mutable plugin configuration.
//!
//! A plugin and its settings panel hold clones of the same
//! [`PluginConfig`]; writes are last-writer-wins and readers take a
//! [`snapshot`](PluginConfig::snapshot) once per operation.

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable copy of a plugin's options.
pub type ConfigSnapshot = HashMap<String, serde_json::Value>;

/// Named options mapped to primitive values, shared by handle.
#[derive(Clone, Debug, Default)]
pub struct PluginConfig {
    values: Arc<RwLock<ConfigSnapshot>>,
}

impl PluginConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config from initial values.
    pub fn from_values(values: ConfigSnapshot) -> Self {
        Self {
            values: Arc::new(RwLock::new(values)),
        }
    }

    /// Copy every option under a single read lock.
    pub fn snapshot(&self) -> ConfigSnapshot {
        self.values.read().clone()
    }

    /// Get a typed config value.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .read()
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Set a config value. Only primitive values are stored.
    pub fn set(&self, key: &str, value: serde_json::Value) -> bool {
        if !is_primitive(&value) {
            return false;
        }
        self.values.write().insert(key.to_string(), value);
        true
    }

    /// Whether two handles share the same storage.
    pub fn shares_storage_with(&self, other: &PluginConfig) -> bool {
        Arc::ptr_eq(&self.values, &other.values)
    }
}

fn is_primitive(value: &serde_json::Value) -> bool {
    matches!(
        value,
        serde_json::Value::Bool(_) | serde_json::Value::Number(_) | serde_json::Value::String(_)
    )
}
