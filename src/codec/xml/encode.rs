//! Records → XML.

use crate::codec::xml::document::{Document, Element};
use crate::codec::xml::settings::XmlCodecSettings;
use crate::core::{now_iso, PasswordMetadata, PasswordRecord, Result};
use quick_xml::escape::escape;

/// Encode `records` with `settings`.
///
/// Each `<password>` carries its 1-based position as `id`. The password is
/// escaped and then wrapped in CDATA, so consumers reading the raw section
/// still see escaped text.
pub fn encode(records: &[PasswordRecord], settings: &XmlCodecSettings) -> Result<String> {
    let mut root = Element::new(settings.effective_root_element());

    for (index, record) in records.iter().enumerate() {
        root.push(password_element(index + 1, record, settings));
    }

    Document::new(settings.effective_encoding(), root).to_xml(settings.pretty_print)
}

fn password_element(id: usize, record: &PasswordRecord, settings: &XmlCodecSettings) -> Element {
    let mut element = Element::new("password")
        .with_attribute("id", &id.to_string())
        .with_child(Element::new("value").with_cdata(&escape(record.password.as_str())));

    if settings.include_metadata {
        if let Some(metadata) = &record.metadata {
            element.push(metadata_element(record, metadata));
        }
    }

    element
}

// Zero length/entropy are treated as absent and not written.
fn metadata_element(record: &PasswordRecord, metadata: &PasswordMetadata) -> Element {
    let mut element = Element::new("metadata");

    if let Some(length) = metadata.length.filter(|l| *l != 0) {
        element.push(Element::new("length").with_text(&length.to_string()));
    }

    if let Some(entropy) = metadata.entropy.filter(|e| is_truthy(*e)) {
        element.push(Element::new("entropy").with_text(&format!("{:.2}", entropy)));
    }

    if let Some(mode) = metadata.mode.as_deref().filter(|m| !m.is_empty()) {
        element.push(Element::new("mode").with_text(mode));
    }

    let generated = record
        .effective_timestamp()
        .map(str::to_string)
        .unwrap_or_else(now_iso);
    element.push(Element::new("generated").with_text(&generated));

    element
}

fn is_truthy(value: f64) -> bool {
    value != 0.0 && !value.is_nan()
}
