use crate::Finding;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry in the summary's top-root-causes list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootCause {
    pub signature_ref: String,
    pub probable_root_cause: String,
    pub total_events: u64,
}

/// Grand totals across all findings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_events: u64,
    pub overall_error_rate: f64,
    pub top_root_causes: Vec<RootCause>,
    pub short_summary: String,
}

/// Terminal artifact of a pipeline run. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub findings: Vec<Finding>,
    pub summary: ReportSummary,
    pub generated_at: DateTime<Utc>,
    pub source_files: Vec<String>,
}
