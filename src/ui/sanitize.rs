//! Host-provided sanitization primitives.
//!
//! Plugins never insert interpolated text into the settings surface
//! without first passing it through these.

/// Markup sanitization and text escaping supplied by the host.
///
/// Both operations must be side-effect-free.
pub trait Sanitizer: Send + Sync {
    /// Sanitize an HTML fragment before it is inserted into the UI.
    fn sanitize_html(&self, html: &str) -> String;

    /// Escape plain text for safe interpolation into HTML.
    fn escape_text(&self, text: &str) -> String;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Sanitizer;
    use parking_lot::Mutex;

    /// Sanitizer that escapes text and records every fragment it sees.
    #[derive(Default)]
    pub struct RecordingSanitizer {
        pub sanitized: Mutex<Vec<String>>,
        pub escaped: Mutex<Vec<String>>,
    }

    impl Sanitizer for RecordingSanitizer {
        fn sanitize_html(&self, html: &str) -> String {
            self.sanitized.lock().push(html.to_string());
            html.to_string()
        }

        fn escape_text(&self, text: &str) -> String {
            self.escaped.lock().push(text.to_string());
            quick_xml::escape::escape(text).into_owned()
        }
    }
}
