use logsift_types::{CandidateFinding, Finding, LogGroup, Severity, signature_id, truncate};
use std::collections::HashMap;

// Placeholder strings models emit when they have nothing to say.
const PLACEHOLDER_CAUSES: &[&str] = &["unknown", "n/a", "na", "none", "tbd", "..."];

const MAX_FALLBACK_TOKENS: usize = 3;
const MAX_CLAUSE_LEN: usize = 60;

/// Reconcile untrusted candidate findings against ground-truth groups.
///
/// Guarantees exactly one finding per group, in the aggregator's order,
/// with `total_events` and `error_rate` recomputed from the group no
/// matter what the model claimed. Candidates referencing signatures that
/// never existed are dropped; groups the model omitted get a finding
/// synthesized from their own evidence.
pub fn validate(groups: &[LogGroup], candidates: Vec<CandidateFinding>) -> Vec<Finding> {
    let mut by_ref: HashMap<String, CandidateFinding> = HashMap::new();
    for candidate in candidates {
        if let Some(signature) = candidate.signature.clone() {
            by_ref.insert(signature, candidate);
        }
    }

    groups
        .iter()
        .map(|group| {
            let id = signature_id(&group.signature);
            // the model may echo either the signature text or its id
            let candidate = by_ref
                .remove(&group.signature)
                .or_else(|| by_ref.remove(&id))
                .unwrap_or_default();

            let mut recommendation = candidate.recommendation.and_then(non_empty);
            let probable_root_cause = match candidate.probable_root_cause.and_then(usable_cause) {
                Some(cause) => cause,
                None => {
                    let fallback = fallback_root_cause(group);
                    if recommendation.is_none()
                        && let Some(token) = group.exception_tokens.iter().next()
                    {
                        recommendation =
                            Some(format!("Investigate {token} and related services"));
                    }
                    fallback
                }
            };

            Finding {
                signature_ref: group.signature.clone(),
                signature_id: id,
                total_events: group.count,
                error_rate: group.error_rate(),
                probable_root_cause,
                recommendation,
                severity: candidate.severity.as_deref().and_then(Severity::parse),
            }
        })
        .collect()
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn usable_cause(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() || PLACEHOLDER_CAUSES.contains(&trimmed.to_lowercase().as_str()) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Deterministic root cause from the group's own evidence: exception
/// tokens when present, otherwise the leading clause of the first example.
fn fallback_root_cause(group: &LogGroup) -> String {
    if !group.exception_tokens.is_empty() {
        return group
            .exception_tokens
            .iter()
            .take(MAX_FALLBACK_TOKENS)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
    }

    if let Some(example) = group.examples.first() {
        let clause = example
            .split(['.', ';'])
            .next()
            .unwrap_or(example)
            .trim();
        if !clause.is_empty() {
            return truncate(clause, MAX_CLAUSE_LEN);
        }
    }

    format!("recurring events matching '{}'", group.signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use logsift_types::Level;
    use std::collections::BTreeSet;

    fn group(signature: &str, errors: u64, infos: u64, tokens: &[&str]) -> LogGroup {
        let mut g = LogGroup::new(signature.to_string());
        for i in 0..errors {
            g.record(
                Level::Error,
                &format!("ERROR {signature} #{i}"),
                tokens.iter().map(|t| t.to_string()).collect(),
            );
        }
        for i in 0..infos {
            g.record(Level::Info, &format!("INFO {signature} #{i}"), BTreeSet::new());
        }
        g
    }

    fn candidate(signature: &str, cause: &str) -> CandidateFinding {
        CandidateFinding {
            signature: Some(signature.to_string()),
            probable_root_cause: Some(cause.to_string()),
            recommendation: None,
            severity: None,
        }
    }

    #[test]
    fn test_one_finding_per_group_with_exact_numbers() {
        let groups = vec![
            group("npe at", 2, 0, &["NullPointerException"]),
            group("service started", 0, 1, &[]),
        ];
        let candidates = vec![candidate("npe at", "null deref in request handler")];

        let findings = validate(&groups, candidates);
        assert_eq!(findings.len(), 2);

        assert_eq!(findings[0].signature_ref, "npe at");
        assert_eq!(findings[0].total_events, 2);
        assert_eq!(findings[0].error_rate, 1.0);
        assert_eq!(findings[0].probable_root_cause, "null deref in request handler");

        assert_eq!(findings[1].signature_ref, "service started");
        assert_eq!(findings[1].total_events, 1);
        assert_eq!(findings[1].error_rate, 0.0);
    }

    #[test]
    fn test_model_numbers_are_never_trusted() {
        // candidate omits/garbles counts; the group is the only source
        let groups = vec![group("db timeout", 3, 1, &["QueryTimeout"])];
        let findings = validate(&groups, vec![candidate("db timeout", "slow replica")]);
        assert_eq!(findings[0].total_events, 4);
        assert_eq!(findings[0].error_rate, 0.75);
    }

    #[test]
    fn test_empty_candidates_still_produce_full_findings() {
        let groups = vec![
            group("npe at", 2, 0, &["NullPointerException"]),
            group("service started", 0, 1, &[]),
        ];
        let findings = validate(&groups, Vec::new());

        assert_eq!(findings.len(), 2);
        assert!(findings[0].probable_root_cause.contains("NullPointerException"));
        assert_eq!(
            findings[0].recommendation.as_deref(),
            Some("Investigate NullPointerException and related services"),
        );
        // no tokens: falls back to the first example's leading clause
        assert!(findings[1].probable_root_cause.contains("service started"));
    }

    #[test]
    fn test_placeholder_cause_is_replaced() {
        let groups = vec![group("npe at", 1, 0, &["NullPointerException"])];
        for placeholder in ["", "  ", "unknown", "N/A", "TBD"] {
            let findings = validate(&groups, vec![candidate("npe at", placeholder)]);
            assert!(
                findings[0].probable_root_cause.contains("NullPointerException"),
                "placeholder {placeholder:?} survived validation",
            );
        }
    }

    #[test]
    fn test_hallucinated_signature_is_dropped() {
        let groups = vec![group("real issue", 1, 0, &[])];
        let findings = validate(
            &groups,
            vec![
                candidate("real issue", "actual cause"),
                candidate("imaginary issue", "invented cause"),
            ],
        );

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].signature_ref, "real issue");
        assert_eq!(findings[0].probable_root_cause, "actual cause");
    }

    #[test]
    fn test_candidate_may_reference_signature_id() {
        let groups = vec![group("keyed by id", 1, 0, &[])];
        let id = signature_id("keyed by id");
        let findings = validate(&groups, vec![candidate(&id, "matched via id")]);
        assert_eq!(findings[0].probable_root_cause, "matched via id");
    }

    #[test]
    fn test_severity_vocabulary_is_enforced() {
        let groups = vec![group("sig", 1, 0, &[])];
        let mut c = candidate("sig", "cause");
        c.severity = Some("CRITICAL".to_string());
        assert_eq!(validate(&groups, vec![c]).remove(0).severity, Some(Severity::Critical));

        let mut c = candidate("sig", "cause");
        c.severity = Some("apocalyptic".to_string());
        assert_eq!(validate(&groups, vec![c]).remove(0).severity, None);
    }

    #[test]
    fn test_output_order_matches_group_order() {
        let groups = vec![
            group("first", 5, 0, &[]),
            group("second", 3, 0, &[]),
            group("third", 1, 0, &[]),
        ];
        let findings = validate(&groups, Vec::new());
        let refs: Vec<&str> = findings.iter().map(|f| f.signature_ref.as_str()).collect();
        assert_eq!(refs, vec!["first", "second", "third"]);
    }
}
