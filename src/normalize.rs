use once_cell::sync::Lazy;
use regex::Regex;

// Compiled once; `\w` here is Unicode-aware, so accented letters survive.
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Prepares raw text for tokenization: every character that is not a letter,
/// digit, underscore, or whitespace becomes a single space, whitespace runs
/// collapse to one space, and the result is trimmed and lowercased.
///
/// Pure and idempotent: `normalize(normalize(t)) == normalize(t)`.
pub fn normalize(text: &str) -> String {
    let text = NON_WORD.replace_all(text, " ");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_lowercase()
}

/// Whitespace-delimited tokens of `text`. Empty input yields no tokens.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> + '_ {
    text.split_whitespace()
}
