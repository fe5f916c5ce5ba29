use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

// Identifier-like tokens with a recognizable error-type suffix.
static EXCEPTION_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*(?:Error|Exception|Failure|Fault|Timeout))\b").unwrap()
});

// `caused by: java.lang.IllegalStateException: ...` / `exception: Foo`
static CAUSE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:caused by|exception)\s*:\s*(\S+)").unwrap());

/// Scan a message for exception/error type evidence.
///
/// Returns the empty set when nothing matches; never fails.
pub fn extract(message: &str) -> BTreeSet<String> {
    let mut tokens = BTreeSet::new();

    for caps in EXCEPTION_TOKEN.captures_iter(message) {
        tokens.insert(caps[1].to_string());
    }

    if let Some(caps) = CAUSE_MARKER.captures(message) {
        let clause = caps[1].trim_end_matches([':', '.', ',', ';']);
        if !clause.is_empty() {
            tokens.insert(clause.to_string());
        }
    }

    tokens
}
