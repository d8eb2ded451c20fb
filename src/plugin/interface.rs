//! Plugin interface definition.
//!
//! Every hook is optional: a plugin lists the hooks it implements in
//! [`Plugin::hooks`] and the registry only dispatches to declared ones.

use crate::core::{HookOptions, PasswordRecord};
use crate::plugin::config::PluginConfig;
use crate::ui::SettingsContainer;
use serde::{Deserialize, Serialize};

/// Plugin identity. No behavioral effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Unique name within a registry
    pub name: String,
    /// Version
    pub version: String,
    /// Description
    pub description: String,
    /// Author
    pub author: String,
}

impl PluginInfo {
    /// Create new plugin info.
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            description: String::new(),
            author: String::new(),
        }
    }

    /// Set description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    /// Set author.
    pub fn with_author(mut self, author: &str) -> Self {
        self.author = author.to_string();
        self
    }
}

/// Result type for plugin operations.
pub type PluginResult<T> = std::result::Result<T, PluginError>;

/// Plugin-specific error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PluginError {
    /// Error message
    pub message: String,
}

impl PluginError {
    /// Create a new error.
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for PluginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PluginError: {}", self.message)
    }
}

impl std::error::Error for PluginError {}

/// Hook slots a plugin may fill.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PluginHook {
    /// Records → text
    Export,
    /// Text → records
    Import,
    /// Settings panel contribution
    UiRender,
    /// Hook unknown to this host
    Custom(String),
}

impl PluginHook {
    /// Whether the registry knows how to dispatch this hook.
    pub fn is_dispatchable(&self) -> bool {
        !matches!(self, PluginHook::Custom(_))
    }
}

impl std::fmt::Display for PluginHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginHook::Export => write!(f, "onExport"),
            PluginHook::Import => write!(f, "onImport"),
            PluginHook::UiRender => write!(f, "onUIRender"),
            PluginHook::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// Plugin trait that all import/export plugins implement.
///
/// Hooks must not panic and must not return errors across the boundary:
/// export and import signal both "not my format" and "failed" with `None`.
pub trait Plugin: Send + Sync {
    /// Get plugin info.
    fn info(&self) -> PluginInfo;

    /// Plugin-owned configuration, if the plugin has any.
    fn config(&self) -> Option<&PluginConfig> {
        None
    }

    /// Hooks this plugin implements.
    fn hooks(&self) -> Vec<PluginHook> {
        Vec::new()
    }

    /// Called once after registration.
    fn on_load(&mut self) -> PluginResult<()> {
        Ok(())
    }

    /// Called once on unregistration.
    fn on_unload(&mut self) -> PluginResult<()> {
        Ok(())
    }

    /// Encode records, or `None` if `options.format` is not handled.
    fn on_export(&self, _records: &[PasswordRecord], _options: &HookOptions) -> Option<String> {
        None
    }

    /// Decode text, or `None` if `options.format` is not handled.
    fn on_import(&self, _text: &str, _options: &HookOptions) -> Option<Vec<PasswordRecord>> {
        None
    }

    /// Contribute a settings block.
    fn on_ui_render(&self, _container: &mut SettingsContainer) -> PluginResult<()> {
        Ok(())
    }
}
