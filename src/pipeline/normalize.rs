//! Text normalization, the first pipeline stage

use regex::Regex;
use std::sync::OnceLock;

fn whitespace_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Collapse every run of whitespace (spaces, tabs, newlines) to a single
/// space and trim the ends
///
/// Pure and idempotent; every downstream stage operates on this form.
pub fn normalize_text(text: &str) -> String {
    whitespace_pattern()
        .replace_all(text.trim(), " ")
        .into_owned()
}
