//! Text normalization for text queries and text filters.

use regex::Regex;
use std::sync::OnceLock;

static WHITESPACE_RUN: OnceLock<Regex> = OnceLock::new();

fn whitespace_run() -> &'static Regex {
    // `\s` is Unicode-aware and already covers U+00A0
    WHITESPACE_RUN.get_or_init(|| Regex::new(r"\s+").expect("static regex is valid"))
}

/// Collapse whitespace runs into single spaces, turn non-breaking spaces into
/// plain spaces and trim both ends.
#[must_use]
pub fn normalize_text(raw: &str) -> String {
    let spaced = raw.replace('\u{a0}', " ");
    whitespace_run()
        .replace_all(&spaced, " ")
        .trim()
        .to_string()
}
