use crate::ChatPrompt;
use logsift_types::{Level, LogGroup, signature_id};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

// The output contract the validator relies on. Counts are requested even
// though they are recomputed locally; echoing them keeps weaker models
// anchored to the input.
const SYSTEM_PROMPT: &str = "You are a concise log triage assistant.\n\
Return JSON ONLY (no prose, no code fences): a JSON array with exactly one object per input signature.\n\
Echo each `signature` exactly as given and keep the input order. Do not invent, drop, or rename signatures.\n\
Each object must include: `signature`, `total_events` (int), `error_rate` (0-1 float), `probable_root_cause`, `recommendation`.\n\
`severity` (low|medium|high|critical) is optional. Keep `probable_root_cause` and `recommendation` under 200 characters.";

#[derive(Serialize)]
struct PromptGroup<'a> {
    signature: &'a str,
    signature_id: String,
    count: u64,
    levels: &'a BTreeMap<Level, u64>,
    exceptions: &'a BTreeSet<String>,
    examples: &'a [String],
}

#[derive(Serialize)]
struct PromptPayload<'a> {
    groups: Vec<PromptGroup<'a>>,
    total_events: u64,
}

/// Serializes aggregated groups into the system+user prompt pair.
///
/// Deterministic for identical input; prompt size is bounded by
/// `max_groups`, with an explicit note about anything omitted.
pub struct PromptBuilder {
    max_groups: usize,
}

impl PromptBuilder {
    /// `max_groups` of 0 means "send all groups".
    pub fn new(max_groups: usize) -> Self {
        Self {
            max_groups: if max_groups == 0 { usize::MAX } else { max_groups },
        }
    }

    pub fn build(&self, groups: &[LogGroup], total_events: u64) -> ChatPrompt {
        let included = groups.len().min(self.max_groups);
        let payload = PromptPayload {
            groups: groups[..included]
                .iter()
                .map(|group| PromptGroup {
                    signature: &group.signature,
                    signature_id: signature_id(&group.signature),
                    count: group.count,
                    levels: &group.level_counts,
                    exceptions: &group.exception_tokens,
                    examples: &group.examples,
                })
                .collect(),
            total_events,
        };

        let mut user = format!(
            "Pre-aggregated log groups and totals:\n{}",
            serde_json::to_string_pretty(&payload)
                .unwrap_or_else(|_| String::from("(failed to serialize)")),
        );
        if groups.len() > included {
            user.push_str(&format!("\n{} more groups omitted", groups.len() - included));
        }

        ChatPrompt {
            system: SYSTEM_PROMPT.to_string(),
            user,
        }
    }
}
