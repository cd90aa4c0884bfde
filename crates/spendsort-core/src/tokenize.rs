//! Description tokenizer
//!
//! Lowercases, turns punctuation into spaces, collapses whitespace and splits
//! on single spaces. Empty or punctuation-only input yields one empty token,
//! which keeps every document at least one token long for tf denominators.

use std::sync::LazyLock;

use regex::Regex;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Split a description into normalized word tokens
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let spaced = NON_WORD.replace_all(&lowered, " ");
    let collapsed = WHITESPACE.replace_all(&spaced, " ");
    collapsed.trim().split(' ').map(str::to_string).collect()
}
