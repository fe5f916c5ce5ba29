use logsift_types::truncate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// Path-like runs: anything anchored on a separator, with optional drive letter.
static PATH_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:[a-z]:)?[/\\][\w.$\-/\\]+").unwrap());

// Source references like `foo.java:42` or `pkg.mod.Class:17`.
static FILE_LINE_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[\w$-]+(?:\.[\w$-]+)+:\d+\b").unwrap());

static NUMBER_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());
static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Tunables for signature normalization.
///
/// How aggressively numbers and paths are stripped controls the collision
/// rate of grouping: stripping more merges more lines into one group.
/// Over-aggressive settings silently merge unrelated error types, so this
/// is configuration rather than a constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureConfig {
    /// Tokens kept from the normalized message.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_true")]
    pub strip_paths: bool,
    #[serde(default = "default_true")]
    pub strip_numbers: bool,
    /// Characters of the lowercased message used when nothing else survives.
    #[serde(default = "default_fallback_prefix_len")]
    pub fallback_prefix_len: usize,
}

fn default_max_tokens() -> usize {
    4
}

fn default_true() -> bool {
    true
}

fn default_fallback_prefix_len() -> usize {
    32
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            strip_paths: true,
            strip_numbers: true,
            fallback_prefix_len: default_fallback_prefix_len(),
        }
    }
}

/// Maps a free-text message to a short canonical signature.
///
/// Pure and deterministic; `normalize` is idempotent. Messages describing
/// the same kind of event are meant to collapse to one signature; a
/// collision between unrelated messages is an accepted heuristic risk.
#[derive(Debug, Clone)]
pub struct Normalizer {
    config: SignatureConfig,
}

impl Normalizer {
    pub fn new(config: SignatureConfig) -> Self {
        Self { config }
    }

    pub fn normalize(&self, message: &str) -> String {
        let lowered = message.to_lowercase();
        let mut s = lowered.clone();

        if self.config.strip_paths {
            s = PATH_RUN.replace_all(&s, " ").into_owned();
            s = FILE_LINE_REF.replace_all(&s, " ").into_owned();
        }
        if self.config.strip_numbers {
            s = NUMBER_RUN.replace_all(&s, " ").into_owned();
        }
        s = NON_ALPHANUMERIC.replace_all(&s, " ").into_owned();
        s = WHITESPACE.replace_all(&s, " ").trim().to_string();

        if s.is_empty() {
            // trimmed again so a prefix cut mid-whitespace stays stable
            // under re-normalization
            return truncate(lowered.trim(), self.config.fallback_prefix_len)
                .trim()
                .to_string();
        }

        s.split(' ')
            .take(self.config.max_tokens)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(SignatureConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_kind_of_line_shares_signature() {
        let n = Normalizer::default();
        assert_eq!(
            n.normalize("NullPointerException at Foo.java:42"),
            n.normalize("NullPointerException at Bar.java:17"),
        );
    }

    #[test]
    fn test_paths_and_numbers_are_stripped() {
        let n = Normalizer::default();
        assert_eq!(
            n.normalize("failed to read /var/lib/app/data-01.db after 3 retries"),
            "failed to read after",
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let n = Normalizer::default();
        for message in [
            "Connection refused to 10.0.0.5:5432",
            "NullPointerException at Foo.java:42",
            "!!! ??? 123",
            "Service started",
            "C:\\Users\\app\\logs\\out.txt unreadable",
        ] {
            let once = n.normalize(message);
            assert_eq!(n.normalize(&once), once, "not idempotent for {message:?}");
        }
    }

    #[test]
    fn test_token_cap_bounds_signature() {
        let n = Normalizer::default();
        let sig = n.normalize("one two three four five six seven");
        assert_eq!(sig, "one two three four");
    }

    #[test]
    fn test_fallback_for_symbol_only_message() {
        let n = Normalizer::default();
        let sig = n.normalize("!!!???");
        assert_eq!(sig, "!!!???");
    }

    #[test]
    fn test_tunables_change_grouping() {
        let loose = Normalizer::default();
        let strict = Normalizer::new(SignatureConfig {
            strip_numbers: false,
            ..SignatureConfig::default()
        });
        let a = "timeout after 30 seconds";
        let b = "timeout after 60 seconds";
        assert_eq!(loose.normalize(a), loose.normalize(b));
        assert_ne!(strict.normalize(a), strict.normalize(b));
    }
}
