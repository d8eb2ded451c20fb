//! XML → records.
//!
//! Whole-document failures: oversized input, forbidden constructs, parse
//! errors. Per-entry leniency: a `<password>` without a usable `<value>`
//! is skipped and the rest of the import proceeds.

use crate::codec::ensure_within_limit;
use crate::codec::xml::document::{Document, Element};
use crate::codec::xml::screen::{screen, strip_doctype};
use crate::core::{now_iso, PasswordMetadata, PasswordRecord, Result};
use quick_xml::escape::unescape;
use tracing::debug;

/// Decode every password entry found in `text`.
pub fn decode(text: &str) -> Result<Vec<PasswordRecord>> {
    ensure_within_limit(text)?;
    screen(text)?;
    let sanitized = strip_doctype(text);
    let document = Document::parse(&sanitized)?;
    debug!(encoding = %document.encoding, root = %document.root.name, "Parsed XML import");

    let imported_at = now_iso();
    let mut records = Vec::new();

    for (index, element) in document.root.find_all("password").into_iter().enumerate() {
        match extract(element) {
            Some(record) => records.push(record.mark_imported(&imported_at)),
            None => debug!(entry = index + 1, "Skipping password entry without a value"),
        }
    }

    Ok(records)
}

fn extract(element: &Element) -> Option<PasswordRecord> {
    let value = element.find("value")?;
    let password = value.text_content_with(&reverse_escaping);
    let password = password.trim();
    if password.is_empty() {
        return None;
    }

    let mut record = PasswordRecord::new(password);
    record.metadata = element.find("metadata").map(metadata_from);
    Some(record)
}

fn metadata_from(element: &Element) -> PasswordMetadata {
    let field = |name: &str| element.find(name).map(|e| e.text_content().trim().to_string());

    PasswordMetadata {
        length: field("length").and_then(|v| parse_length(&v)),
        entropy: field("entropy").and_then(|v| v.parse::<f64>().ok().filter(|e| e.is_finite())),
        mode: field("mode"),
        timestamp: field("generated"),
    }
}

fn parse_length(text: &str) -> Option<u64> {
    text.parse::<u64>().ok().or_else(|| {
        text.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v.trunc() as u64)
    })
}

// CDATA values were entity-escaped before wrapping; undo that layer.
// Content that is not valid escaped text is kept as written.
fn reverse_escaping(raw: &str) -> String {
    unescape(raw)
        .map(|text| text.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::xml::encode::encode;
    use crate::codec::xml::settings::XmlCodecSettings;
    use crate::codec::MAX_IMPORT_BYTES;
    use crate::core::Error;

    const THREE_ENTRIES_SECOND_BROKEN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<passwords>
  <password id="1"><value><![CDATA[first]]></value></password>
  <password id="2"><metadata><length>5</length></metadata></password>
  <password id="3"><value><![CDATA[third]]></value></password>
</passwords>"#;

    #[test]
    fn test_roundtrip_preserves_password_and_entropy() {
        let records = vec![
            PasswordRecord::new("correct horse battery").with_metadata(
                PasswordMetadata::default()
                    .with_length(21)
                    .with_entropy(77.123)
                    .with_mode("passphrase")
                    .with_timestamp("2024-05-01T12:00:00.000Z"),
            ),
            PasswordRecord::new("Zx9!").with_metadata(
                PasswordMetadata::default()
                    .with_length(4)
                    .with_entropy(26.2)
                    .with_mode("syllables")
                    .with_timestamp("2024-05-02T12:00:00.000Z"),
            ),
        ];

        let xml = encode(&records, &XmlCodecSettings::default()).unwrap();
        let decoded = decode(&xml).unwrap();

        assert_eq!(decoded.len(), 2);
        for (original, back) in records.iter().zip(&decoded) {
            let (om, bm) = (original.metadata.as_ref().unwrap(), back.metadata.as_ref().unwrap());
            assert_eq!(back.password, original.password);
            assert_eq!(
                format!("{:.2}", bm.entropy.unwrap()),
                format!("{:.2}", om.entropy.unwrap())
            );
            assert_eq!(bm.length, om.length);
            assert_eq!(bm.mode, om.mode);
            assert_eq!(bm.timestamp, om.timestamp);
            assert!(back.imported);
            assert!(back.imported_at.is_some());
        }
    }

    #[test]
    fn test_roundtrip_drops_zero_metadata() {
        let records = vec![PasswordRecord::new("p").with_metadata(
            PasswordMetadata::default()
                .with_length(0)
                .with_entropy(0.0)
                .with_mode("manual"),
        )];

        let decoded = decode(&encode(&records, &XmlCodecSettings::default()).unwrap()).unwrap();
        let metadata = decoded[0].metadata.as_ref().unwrap();

        assert_eq!(metadata.length, None);
        assert_eq!(metadata.entropy, None);
        assert_eq!(metadata.mode.as_deref(), Some("manual"));
    }

    #[test]
    fn test_reserved_characters_roundtrip() {
        for password in ["&<>\"'", "a]]>b", "&amp;literal", "  spaced  inside  "] {
            let xml = encode(&[PasswordRecord::new(password)], &XmlCodecSettings::default()).unwrap();
            let decoded = decode(&xml).unwrap();
            assert_eq!(decoded[0].password, password.trim());
        }
    }

    #[test]
    fn test_partial_tolerance() {
        let records = decode(THREE_ENTRIES_SECOND_BROKEN).unwrap();
        let passwords: Vec<_> = records.iter().map(|r| r.password.as_str()).collect();
        assert_eq!(passwords, ["first", "third"]);
    }

    #[test]
    fn test_nested_entries_and_plain_text_values() {
        let xml = "<export><group><password><value> a&amp;b </value></password></group>\
                   <password><value>c</value><metadata><mode>pin</mode></metadata></password></export>";
        let records = decode(xml).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].password, "a&b");
        assert!(records[0].metadata.is_none());
        assert_eq!(records[1].metadata.as_ref().unwrap().mode.as_deref(), Some("pin"));
    }

    #[test]
    fn test_absent_and_unparseable_metadata_omitted() {
        let xml = "<passwords><password><value>x</value><metadata>\
                   <length>abc</length><entropy>12.5</entropy></metadata></password></passwords>";
        let records = decode(xml).unwrap();
        let metadata = records[0].metadata.as_ref().unwrap();

        assert_eq!(metadata.length, None);
        assert_eq!(metadata.entropy, Some(12.5));
        assert_eq!(metadata.mode, None);
        assert_eq!(metadata.timestamp, None);
    }

    #[test]
    fn test_entity_declaration_rejected_any_case() {
        for decl in ["<!ENTITY", "<!entity", "<!Entity"] {
            let xml = format!(
                "<?xml version=\"1.0\"?><!-- {} xxe \"boom\" --><passwords><password><value>x</value></password></passwords>",
                decl
            );
            assert!(matches!(decode(&xml), Err(Error::ForbiddenContent(_))));
        }
    }

    #[test]
    fn test_external_entity_attack_rejected() {
        let xml = r#"<?xml version="1.0"?>
<!DOCTYPE passwords [<!ENTITY xxe SYSTEM "file:///etc/passwd">]>
<passwords><password><value>&xxe;</value></password></passwords>"#;
        assert!(matches!(decode(xml), Err(Error::ForbiddenContent(_))));
    }

    #[test]
    fn test_plain_doctype_is_stripped() {
        let xml = "<?xml version=\"1.0\"?><!DOCTYPE passwords><passwords><password><value>ok</value></password></passwords>";
        let records = decode(xml).unwrap();
        assert_eq!(records[0].password, "ok");
    }

    #[test]
    fn test_malformed_document_rejected() {
        assert!(matches!(
            decode("<passwords><password><value>x</password>"),
            Err(Error::MalformedDocument(_))
        ));
        assert!(matches!(decode("not xml at all"), Err(Error::MalformedDocument(_))));
    }

    #[test]
    fn test_deep_nesting_under_ceiling_rejected() {
        let depth = 200_000;
        let xml = format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));
        assert!(xml.len() < MAX_IMPORT_BYTES);

        assert!(matches!(decode(&xml), Err(Error::MalformedDocument(_))));
    }

    #[test]
    fn test_size_ceiling() {
        let entry = "<passwords><password><value>x</value></password></passwords>";

        let exact = format!("{}{}", entry, " ".repeat(MAX_IMPORT_BYTES - entry.len()));
        assert_eq!(exact.len(), MAX_IMPORT_BYTES);
        assert_eq!(decode(&exact).unwrap().len(), 1);

        let over = format!("{} ", exact);
        assert_eq!(over.len(), MAX_IMPORT_BYTES + 1);
        assert!(matches!(decode(&over), Err(Error::OversizedInput { .. })));
    }

    #[test]
    fn test_oversized_rejected_before_screening() {
        let over = format!("<!ENTITY{}", " ".repeat(MAX_IMPORT_BYTES));
        assert!(matches!(decode(&over), Err(Error::OversizedInput { .. })));
    }

    #[test]
    fn test_parse_length_variants() {
        assert_eq!(parse_length("12"), Some(12));
        assert_eq!(parse_length("12.9"), Some(12));
        assert_eq!(parse_length("-1"), None);
        assert_eq!(parse_length("NaN"), None);
    }
}
