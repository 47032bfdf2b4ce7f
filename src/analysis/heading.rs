//! Condition heading extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Label used when no condition heading is found.
pub const UNKNOWN_CONDITION: &str = "Unknown";

lazy_static! {
    static ref BOLD_SPAN: Regex = Regex::new(r"\*\*(.*?)\*\*").unwrap();
}

/// The first `**bold**` span on a single line, if any.
pub fn extract_condition(text: &str) -> Option<String> {
    BOLD_SPAN
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// The first bold span, or [`UNKNOWN_CONDITION`].
pub fn condition_or_unknown(text: &str) -> String {
    extract_condition(text).unwrap_or_else(|| UNKNOWN_CONDITION.to_string())
}
