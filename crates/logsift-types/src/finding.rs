use serde::{Deserialize, Serialize};

/// Severity label a model may attach to a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Case-insensitive parse; unknown vocabulary maps to None, not an error.
    pub fn parse(s: &str) -> Option<Severity> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Severity::Low),
            "medium" | "moderate" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

/// A finding as returned by the model, before validation.
///
/// Deserialization is deliberately lenient: every field is optional,
/// unknown fields (including any counts the model echoes back) are
/// ignored, and nothing here is trusted until the validator reconciles it
/// against the aggregated groups.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateFinding {
    #[serde(default, alias = "signature_ref")]
    pub signature: Option<String>,
    #[serde(default)]
    pub probable_root_cause: Option<String>,
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
}

/// A validated statement about one group.
///
/// `total_events` and `error_rate` are always recomputed from the group;
/// the model only ever contributes the free-text fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub signature_ref: String,
    /// Stable sha256-derived key downstream dedup can use.
    pub signature_id: String,
    pub total_events: u64,
    pub error_rate: f64,
    pub probable_root_cause: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}
