use is_terminal::IsTerminal;
use logsift_runtime::PipelineOutcome;
use logsift_types::Report;
use owo_colors::OwoColorize;

pub fn print_outcome(outcome: &PipelineOutcome) {
    let color = std::io::stdout().is_terminal();
    print_report(&outcome.report, color);

    println!();
    println!(
        "Parsed {} events from {} files ({} lines skipped)",
        outcome.stats.parsed_events, outcome.stats.files, outcome.stats.skipped_lines
    );
    if !outcome.model_used {
        println!("Model skipped; root causes derived from group evidence");
    }
    println!(
        "Wrote {} and {}",
        outcome.json_path.display(),
        outcome.markdown_path.display()
    );
}

fn print_report(report: &Report, color: bool) {
    if color {
        println!("{}", report.summary.short_summary.bold());
    } else {
        println!("{}", report.summary.short_summary);
    }
    println!();

    for finding in &report.findings {
        let line = format!(
            "{:>6}x {:>6.1}%  {}  {}",
            finding.total_events,
            finding.error_rate * 100.0,
            finding.signature_ref,
            finding.probable_root_cause,
        );
        if color && finding.error_rate > 0.0 {
            println!("{}", line.red());
        } else {
            println!("{line}");
        }
    }
}
