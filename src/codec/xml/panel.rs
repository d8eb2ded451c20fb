//! Settings panel for the XML codec.
//!
//! The panel holds a clone of the plugin's [`PluginConfig`], so every
//! handler writes straight into the config the codec reads from.
//! Interpolated values are escaped with the host primitive and every
//! fragment is passed through the host sanitizer before insertion.

use crate::codec::xml::encode::encode;
use crate::codec::xml::settings::{is_valid_element_name, XmlCodecSettings, MAX_ROOT_ELEMENT_LEN};
use crate::core::{Error, PasswordMetadata, PasswordRecord, Result};
use crate::plugin::config::PluginConfig;
use crate::ui::{Sanitizer, SettingsContainer};
use serde_json::json;
use tracing::{debug, warn};

/// Element ids used in the rendered fragment.
pub const PRETTY_PRINT_ID: &str = "xml-pretty-print";
pub const INCLUDE_METADATA_ID: &str = "xml-include-metadata";
pub const ROOT_ELEMENT_ID: &str = "xml-root-element";
pub const TEST_EXPORT_ID: &str = "xml-test-export";
pub const TEST_OUTPUT_ID: &str = "xml-test-output";

/// Live-bound settings handlers for the XML codec.
#[derive(Clone, Debug)]
pub struct XmlSettingsPanel {
    plugin: String,
    config: PluginConfig,
}

impl XmlSettingsPanel {
    /// Bind a panel to `config`.
    pub fn new(plugin: &str, config: PluginConfig) -> Self {
        Self {
            plugin: plugin.to_string(),
            config,
        }
    }

    /// Config this panel writes to.
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Pretty-print checkbox changed.
    pub fn set_pretty_print(&self, enabled: bool) {
        self.config
            .set(XmlCodecSettings::key_pretty_print(), json!(enabled));
        debug!(plugin = %self.plugin, enabled, "prettyPrint updated");
    }

    /// Metadata checkbox changed.
    pub fn set_include_metadata(&self, enabled: bool) {
        self.config
            .set(XmlCodecSettings::key_include_metadata(), json!(enabled));
        debug!(plugin = %self.plugin, enabled, "includeMetadata updated");
    }

    /// Root-element input changed.
    ///
    /// Input is trimmed and capped at 50 characters. Names that are not
    /// valid element names leave the config unchanged.
    pub fn set_root_element(&self, input: &str) -> Result<String> {
        let name: String = input.trim().chars().take(MAX_ROOT_ELEMENT_LEN).collect();

        if !is_valid_element_name(&name) {
            warn!(plugin = %self.plugin, "Rejected root element name");
            return Err(Error::Configuration(format!(
                "'{}' is not a valid element name",
                name
            )));
        }

        self.config
            .set(XmlCodecSettings::key_root_element(), json!(name));
        debug!(plugin = %self.plugin, root = %name, "rootElement updated");
        Ok(name)
    }

    /// Render the settings block into `container`.
    pub fn render(&self, container: &mut SettingsContainer) {
        let settings = XmlCodecSettings::from_snapshot(&self.config.snapshot());
        let html = self.fragment(&settings, container.sanitizer());
        container.insert(&self.plugin, &html);
    }

    /// Encode a fixed sample with the current settings and return the
    /// sanitized preview fragment.
    pub fn run_test_export(&self, sanitizer: &dyn Sanitizer) -> Result<String> {
        let settings = XmlCodecSettings::from_snapshot(&self.config.snapshot());
        let xml = encode(&[sample_record()], &settings)?;

        let html = format!(
            "<pre id=\"{}\" class=\"xml-preview\"><code>{}</code></pre>",
            TEST_OUTPUT_ID,
            sanitizer.escape_text(&xml)
        );
        Ok(sanitizer.sanitize_html(&html))
    }

    fn fragment(&self, settings: &XmlCodecSettings, sanitizer: &dyn Sanitizer) -> String {
        let checked = |on: bool| if on { " checked" } else { "" };

        format!(
            concat!(
                "<div class=\"plugin-settings\" data-plugin=\"{plugin}\">",
                "<h4>XML Export Settings</h4>",
                "<label><input type=\"checkbox\" id=\"{pretty_id}\"{pretty}> Pretty print output</label>",
                "<label><input type=\"checkbox\" id=\"{meta_id}\"{meta}> Include metadata</label>",
                "<label>Root element: <input type=\"text\" id=\"{root_id}\" value=\"{root}\" maxlength=\"{max}\"></label>",
                "<button type=\"button\" id=\"{test_id}\">Test export</button>",
                "<div id=\"{output_id}\"></div>",
                "</div>"
            ),
            plugin = sanitizer.escape_text(&self.plugin),
            pretty_id = PRETTY_PRINT_ID,
            pretty = checked(settings.pretty_print),
            meta_id = INCLUDE_METADATA_ID,
            meta = checked(settings.include_metadata),
            root_id = ROOT_ELEMENT_ID,
            root = sanitizer.escape_text(&settings.root_element),
            max = MAX_ROOT_ELEMENT_LEN,
            test_id = TEST_EXPORT_ID,
            output_id = TEST_OUTPUT_ID,
        )
    }
}

fn sample_record() -> PasswordRecord {
    PasswordRecord::new("Test&Password<123>").with_metadata(
        PasswordMetadata::default()
            .with_length(18)
            .with_entropy(95.5)
            .with_mode("syllables")
            .with_timestamp("2025-01-01T00:00:00.000Z"),
    )
}
