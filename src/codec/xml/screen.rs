//! Pre-parse screening of untrusted XML.
//!
//! A cheap first pass over the raw text. It does not replace the parser's
//! own refusal to process DTDs; both must hold.

use crate::core::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Forbidden constructs, matched case-insensitively on raw input.
static FORBIDDEN_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("entity declaration", r"(?i)<!ENTITY"),
        ("DOCTYPE internal subset", r"(?i)<!DOCTYPE[^>]*\["),
        ("SYSTEM external identifier", r#"(?i)\bSYSTEM\s+["']"#),
        ("PUBLIC external identifier", r#"(?i)\bPUBLIC\s+["']"#),
    ]
    .into_iter()
    .map(|(label, pattern)| (label, Regex::new(pattern).expect("valid screening regex")))
    .collect()
});

static DOCTYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<!DOCTYPE[^>]*>").expect("valid doctype regex"));

/// Reject the whole input if any forbidden construct appears anywhere.
pub fn screen(text: &str) -> Result<()> {
    for (label, pattern) in FORBIDDEN_PATTERNS.iter() {
        if pattern.is_match(text) {
            return Err(Error::ForbiddenContent(label.to_string()));
        }
    }
    Ok(())
}

/// Remove DOCTYPE declarations that passed screening.
pub fn strip_doctype(text: &str) -> Cow<'_, str> {
    DOCTYPE_RE.replace_all(text, "")
}
