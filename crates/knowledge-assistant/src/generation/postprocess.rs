//! Cleanup of raw completion text

use once_cell::sync::Lazy;
use regex::Regex;

/// Complete reasoning blocks, content included
static THINK_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid regex"));

/// Any stray opening or closing marker
static THINK_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?think>").expect("valid regex"));

/// Strip internal reasoning markup and surrounding whitespace
pub fn clean_response(raw: &str) -> String {
    let without_blocks = THINK_BLOCK.replace_all(raw, "");
    THINK_TAG.replace_all(&without_blocks, "").trim().to_string()
}
