//! XML codec plugin.
//!
//! Handles the `xml` format for both export and import and contributes a
//! settings block.

pub mod decode;
pub mod document;
pub mod encode;
pub mod panel;
pub mod screen;
pub mod settings;

pub use panel::XmlSettingsPanel;
pub use settings::XmlCodecSettings;

use crate::core::{Error, HookOptions, PasswordRecord, Result};
use crate::plugin::{Plugin, PluginConfig, PluginHook, PluginInfo, PluginResult};
use crate::ui::SettingsContainer;
use tracing::{debug, error, info, warn};

/// Format name this plugin claims.
pub const XML_FORMAT: &str = "xml";

/// Plugin name.
pub const XML_PLUGIN_NAME: &str = "xml-export";

/// XML import/export plugin.
pub struct XmlCodecPlugin {
    info: PluginInfo,
    config: PluginConfig,
}

impl XmlCodecPlugin {
    /// Create with default settings.
    pub fn new() -> Self {
        Self::with_settings(XmlCodecSettings::default())
    }

    /// Create with explicit settings.
    pub fn with_settings(settings: XmlCodecSettings) -> Self {
        Self {
            info: PluginInfo::new(XML_PLUGIN_NAME, env!("CARGO_PKG_VERSION"))
                .with_description("Export and import passwords as XML")
                .with_author("GenPwd"),
            config: PluginConfig::from_values(settings.to_values()),
        }
    }

    /// Current settings, read from one config snapshot.
    pub fn settings(&self) -> XmlCodecSettings {
        XmlCodecSettings::from_snapshot(&self.config.snapshot())
    }

    /// Settings panel bound to this plugin's live config.
    pub fn settings_panel(&self) -> XmlSettingsPanel {
        XmlSettingsPanel::new(&self.info.name, self.config.clone())
    }

    /// Encode records with the current settings.
    pub fn encode(&self, records: &[PasswordRecord]) -> Result<String> {
        encode::encode(records, &self.settings())
    }

    /// Decode an XML document.
    pub fn decode(&self, text: &str) -> Result<Vec<PasswordRecord>> {
        decode::decode(text)
    }
}

impl Default for XmlCodecPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for XmlCodecPlugin {
    fn info(&self) -> PluginInfo {
        self.info.clone()
    }

    fn config(&self) -> Option<&PluginConfig> {
        Some(&self.config)
    }

    fn hooks(&self) -> Vec<PluginHook> {
        vec![PluginHook::Export, PluginHook::Import, PluginHook::UiRender]
    }

    fn on_load(&mut self) -> PluginResult<()> {
        info!(plugin = %self.info.name, version = %self.info.version, "XML codec loaded");
        Ok(())
    }

    fn on_unload(&mut self) -> PluginResult<()> {
        info!(plugin = %self.info.name, "XML codec unloaded");
        Ok(())
    }

    fn on_export(&self, records: &[PasswordRecord], options: &HookOptions) -> Option<String> {
        if !options.is_format(XML_FORMAT) {
            return None;
        }

        match self.encode(records) {
            Ok(xml) => {
                debug!(records = records.len(), bytes = xml.len(), "XML export complete");
                Some(xml)
            }
            Err(e) => {
                error!(error = %e, "XML export failed");
                None
            }
        }
    }

    fn on_import(&self, text: &str, options: &HookOptions) -> Option<Vec<PasswordRecord>> {
        if !options.is_format(XML_FORMAT) {
            return None;
        }

        match self.decode(text) {
            Ok(records) => {
                debug!(records = records.len(), "XML import complete");
                Some(records)
            }
            Err(e) if e.is_security_rejection() => {
                warn!(error = %e, "XML import rejected");
                None
            }
            Err(e @ Error::MalformedDocument(_)) => {
                warn!(error = %e, "XML import could not be parsed");
                None
            }
            Err(e) => {
                error!(error = %e, "XML import failed");
                None
            }
        }
    }

    fn on_ui_render(&self, container: &mut SettingsContainer) -> PluginResult<()> {
        self.settings_panel().render(container);
        Ok(())
    }
}
