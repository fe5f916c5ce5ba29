use chrono::{DateTime, Utc};
use logsift_types::{Finding, Level, LogGroup, Report, ReportSummary, RootCause};
use std::collections::HashMap;

const TOP_ROOT_CAUSES: usize = 3;

/// Assemble the terminal report from validated findings.
///
/// `groups` are the same aggregates the findings were validated against;
/// they supply the exact per-level totals for the summary so the narrative
/// can never drift from the numbers.
pub fn build_report(
    findings: Vec<Finding>,
    groups: &[LogGroup],
    source_files: Vec<String>,
    generated_at: DateTime<Utc>,
) -> Report {
    let total_events: u64 = findings.iter().map(|f| f.total_events).sum();

    let mut errors = 0u64;
    let mut warnings = 0u64;
    let mut infos = 0u64;
    for group in groups {
        for (level, n) in &group.level_counts {
            match level {
                Level::Error => errors += n,
                Level::Warn => warnings += n,
                Level::Info => infos += n,
                Level::Debug | Level::Unknown => {}
            }
        }
    }

    let overall_error_rate = if total_events == 0 {
        0.0
    } else {
        errors as f64 / total_events as f64
    };

    let by_signature: HashMap<&str, &LogGroup> =
        groups.iter().map(|g| (g.signature.as_str(), g)).collect();
    let level_count = |f: &Finding, level: Level| -> u64 {
        by_signature
            .get(f.signature_ref.as_str())
            .and_then(|g| g.level_counts.get(&level).copied())
            .unwrap_or(0)
    };

    // Error-heavy groups first, then warning-heavy, then sheer volume.
    let mut ranked: Vec<&Finding> = findings.iter().collect();
    ranked.sort_by(|a, b| {
        level_count(b, Level::Error)
            .cmp(&level_count(a, Level::Error))
            .then_with(|| level_count(b, Level::Warn).cmp(&level_count(a, Level::Warn)))
            .then_with(|| b.total_events.cmp(&a.total_events))
            .then_with(|| a.signature_ref.cmp(&b.signature_ref))
    });
    let top_root_causes: Vec<RootCause> = ranked
        .iter()
        .take(TOP_ROOT_CAUSES)
        .map(|f| RootCause {
            signature_ref: f.signature_ref.clone(),
            probable_root_cause: f.probable_root_cause.clone(),
            total_events: f.total_events,
        })
        .collect();

    let mut short_summary = format!(
        "{total_events} events: {errors} errors, {warnings} warnings, {infos} info \
         (error rate {:.1}%).",
        overall_error_rate * 100.0,
    );
    if errors > 0 {
        let top_errors: Vec<&str> = ranked
            .iter()
            .filter(|f| level_count(f, Level::Error) > 0)
            .take(TOP_ROOT_CAUSES)
            .map(|f| f.signature_ref.as_str())
            .collect();
        short_summary.push_str(&format!(" Top errors: {}.", top_errors.join(", ")));
    }

    Report {
        findings,
        summary: ReportSummary {
            total_events,
            overall_error_rate,
            top_root_causes,
            short_summary,
        },
        generated_at,
        source_files,
    }
}

/// Render the report as a scannable markdown document.
pub fn render_markdown(report: &Report) -> String {
    let mut out = String::new();
    out.push_str("# Log Triage Summary\n\n");
    out.push_str(&format!(
        "Generated: {}\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
    ));
    out.push_str(&format!("Sources: {}\n\n", report.source_files.join(", ")));
    out.push_str(&format!("{}\n\n", report.summary.short_summary));

    if report.findings.is_empty() {
        out.push_str("No findings.\n");
        return out;
    }

    out.push_str("| Signature | Id | Events | Error rate | Probable root cause |\n");
    out.push_str("|---|---|---:|---:|---|\n");
    for finding in &report.findings {
        out.push_str(&format!(
            "| `{}` | `{}` | {} | {:.1}% | {} |\n",
            finding.signature_ref,
            finding.signature_id,
            finding.total_events,
            finding.error_rate * 100.0,
            markdown_cell(&finding.probable_root_cause),
        ));
    }

    out.push_str("\n## Top root causes\n\n");
    for (i, cause) in report.summary.top_root_causes.iter().enumerate() {
        out.push_str(&format!(
            "{}. **{}** ({} events): {}\n",
            i + 1,
            cause.signature_ref,
            cause.total_events,
            cause.probable_root_cause,
        ));
    }

    out
}

fn markdown_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use logsift_types::signature_id;
    use std::collections::BTreeSet;

    fn group(signature: &str, errors: u64, infos: u64) -> LogGroup {
        let mut g = LogGroup::new(signature.to_string());
        for _ in 0..errors {
            g.record(Level::Error, "err line", BTreeSet::new());
        }
        for _ in 0..infos {
            g.record(Level::Info, "info line", BTreeSet::new());
        }
        g
    }

    fn finding(signature: &str, total: u64, rate: f64, cause: &str) -> Finding {
        Finding {
            signature_ref: signature.to_string(),
            signature_id: signature_id(signature),
            total_events: total,
            error_rate: rate,
            probable_root_cause: cause.to_string(),
            recommendation: None,
            severity: None,
        }
    }

    #[test]
    fn test_summary_totals_match_findings() {
        let groups = vec![group("a failed", 2, 0), group("b started", 0, 3)];
        let findings = vec![
            finding("a failed", 2, 1.0, "AError"),
            finding("b started", 3, 0.0, "startup chatter"),
        ];
        let report = build_report(
            findings,
            &groups,
            vec!["app.log".to_string()],
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        );

        assert_eq!(report.summary.total_events, 5);
        assert_eq!(report.summary.overall_error_rate, 0.4);
        assert_eq!(
            report.summary.total_events,
            report.findings.iter().map(|f| f.total_events).sum::<u64>()
        );
        assert!(report.summary.short_summary.contains("5 events"));
        assert!(report.summary.short_summary.contains("2 errors"));
        assert!(report.summary.short_summary.contains("Top errors: a failed."));
    }

    #[test]
    fn test_top_root_causes_prioritize_errors_over_volume() {
        let groups = vec![group("noisy info", 0, 50), group("rare error", 3, 0)];
        let findings = vec![
            finding("noisy info", 50, 0.0, "chatter"),
            finding("rare error", 3, 1.0, "OomError"),
        ];
        let report = build_report(findings, &groups, vec![], Utc::now());

        assert_eq!(report.summary.top_root_causes[0].signature_ref, "rare error");
        assert_eq!(report.summary.top_root_causes[1].signature_ref, "noisy info");
    }

    #[test]
    fn test_empty_report_renders_placeholder() {
        let report = build_report(vec![], &[], vec!["empty.log".to_string()], Utc::now());
        let md = render_markdown(&report);
        assert!(md.contains("No findings."));
    }

    #[test]
    fn test_markdown_escapes_table_breakers() {
        assert_eq!(markdown_cell("a|b\nc"), "a\\|b c");
    }
}
