use crate::traits::{ChatOptions, ChatPrompt, ChatTransport};
use crate::{Error, Result};
use logsift_types::CandidateFinding;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Bounded retry with doubling delay between attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

/// Drives the model call and parses its answer into candidate findings.
pub struct Synthesizer {
    transport: Box<dyn ChatTransport>,
    options: ChatOptions,
    retry: RetryPolicy,
}

impl Synthesizer {
    pub fn new(transport: Box<dyn ChatTransport>, options: ChatOptions) -> Self {
        Self {
            transport,
            options,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Call the model and parse its response into candidates.
    ///
    /// Malformed output is not an error here: it degrades to an empty
    /// candidate list and the validator repairs the damage downstream.
    /// Only a provider that stays unreachable through every attempt is
    /// surfaced, as `Error::Exhausted`.
    pub async fn synthesize(&self, prompt: &ChatPrompt) -> Result<Vec<CandidateFinding>> {
        let mut last_error: Option<Error> = None;

        for attempt in 1..=self.retry.max_attempts {
            debug!(
                attempt,
                provider = self.transport.id(),
                model = %self.options.model,
                "requesting findings"
            );

            let outcome = tokio::time::timeout(
                self.options.timeout,
                self.transport.chat(prompt, &self.options),
            )
            .await;

            match outcome {
                Ok(Ok(raw)) => {
                    debug!(chars = raw.len(), "model responded");
                    return Ok(parse_candidates(&raw));
                }
                Ok(Err(err)) => {
                    warn!(attempt, error = %err, "model call failed");
                    last_error = Some(err);
                }
                Err(_) => {
                    let secs = self.options.timeout.as_secs();
                    warn!(attempt, timeout_s = secs, "model call timed out");
                    last_error = Some(Error::Timeout(secs));
                }
            }

            if attempt < self.retry.max_attempts {
                let delay = self.retry.base_delay * 2u32.pow(attempt - 1);
                tokio::time::sleep(delay).await;
            }
        }

        Err(Error::Exhausted {
            attempts: self.retry.max_attempts,
            last: Box::new(
                last_error
                    .unwrap_or_else(|| Error::EmptyResponse(self.transport.id().to_string())),
            ),
        })
    }
}

/// Parse raw model text into candidate findings.
///
/// Accepts a bare array, or an object wrapping the array under `groups`
/// or `findings`, with optional markdown fences around either. Anything
/// else yields an empty list; the validator owns recovery from that.
pub fn parse_candidates(raw: &str) -> Vec<CandidateFinding> {
    let cleaned = strip_fences(raw);
    let value: Value = match serde_json::from_str(cleaned) {
        Ok(value) => value,
        Err(err) => {
            warn!(%err, "model output was not valid JSON");
            return Vec::new();
        }
    };

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            match map.remove("groups").or_else(|| map.remove("findings")) {
                Some(Value::Array(items)) => items,
                _ => {
                    warn!("model output carried no findings array");
                    return Vec::new();
                }
            }
        }
        _ => return Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<CandidateFinding>(item).ok())
        .collect()
}

fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the opening fence line (possibly carrying a language tag)
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.trim_end().trim_end_matches("```").trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_bare_array() {
        let raw = r#"[{"signature": "a", "probable_root_cause": "cause a"}]"#;
        let candidates = parse_candidates(raw);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].signature.as_deref(), Some("a"));
    }

    #[test]
    fn test_parses_fenced_array_with_language_tag() {
        let raw = "```json\n[{\"signature\": \"a\"}]\n```";
        assert_eq!(parse_candidates(raw).len(), 1);
    }

    #[test]
    fn test_parses_object_wrapping_groups() {
        let raw = r#"{"groups": [{"signature": "a"}, {"signature": "b"}], "summary": {}}"#;
        assert_eq!(parse_candidates(raw).len(), 2);
    }

    #[test]
    fn test_parses_object_wrapping_findings() {
        let raw = r#"{"findings": [{"signature_ref": "a"}]}"#;
        let candidates = parse_candidates(raw);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].signature.as_deref(), Some("a"));
    }

    #[test]
    fn test_invalid_json_yields_empty() {
        assert!(parse_candidates("I could not analyze the logs, sorry!").is_empty());
        assert!(parse_candidates("").is_empty());
        assert!(parse_candidates("{\"signature\": }").is_empty());
    }

    #[test]
    fn test_non_object_elements_are_skipped() {
        let raw = r#"[{"signature": "a"}, "stray string", 42]"#;
        assert_eq!(parse_candidates(raw).len(), 1);
    }

    #[test]
    fn test_scalar_top_level_yields_empty() {
        assert!(parse_candidates("\"just a string\"").is_empty());
        assert!(parse_candidates("{\"summary\": {}}").is_empty());
    }
}
