//! Settings container that plugins render into.

use crate::ui::sanitize::Sanitizer;
use std::sync::Arc;

/// A settings block contributed by one plugin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsSection {
    /// Contributing plugin
    pub plugin: String,
    /// Sanitized HTML fragment
    pub html: String,
}

/// Target of `dispatch_ui_render`.
///
/// Carries the host sanitizer so renderers can sanitize before inserting.
pub struct SettingsContainer {
    sanitizer: Arc<dyn Sanitizer>,
    sections: Vec<SettingsSection>,
}

impl SettingsContainer {
    /// Create an empty container.
    pub fn new(sanitizer: Arc<dyn Sanitizer>) -> Self {
        Self {
            sanitizer,
            sections: Vec::new(),
        }
    }

    /// Host sanitizer.
    pub fn sanitizer(&self) -> &dyn Sanitizer {
        self.sanitizer.as_ref()
    }

    /// Sanitize `html` and append it as `plugin`'s section.
    pub fn insert(&mut self, plugin: &str, html: &str) {
        let html = self.sanitizer.sanitize_html(html);
        self.sections.push(SettingsSection {
            plugin: plugin.to_string(),
            html,
        });
    }

    /// Rendered sections in insertion order.
    pub fn sections(&self) -> &[SettingsSection] {
        &self.sections
    }

    /// Section contributed by `plugin`, if any.
    pub fn section(&self, plugin: &str) -> Option<&SettingsSection> {
        self.sections.iter().find(|s| s.plugin == plugin)
    }

    /// Drop all rendered sections.
    pub fn clear(&mut self) {
        self.sections.clear();
    }
}
