use crate::config::Config;
use crate::ops::ingest::{self, IngestStats};
use crate::Result;
use crate::storage;
use chrono::Utc;
use logsift_engine::{build_report, render_markdown, validate};
use logsift_llm::{
    ChatOptions, ChatTransport, PromptBuilder, RetryPolicy, Synthesizer, create_transport,
};
use logsift_types::Report;
use std::path::PathBuf;
use tracing::{info, warn};

pub const FINDINGS_FILE: &str = "log_findings.json";
pub const SUMMARY_FILE: &str = "log_summary.md";

#[derive(Debug)]
pub struct PipelineOutcome {
    pub report: Report,
    pub json_path: PathBuf,
    pub markdown_path: PathBuf,
    pub stats: IngestStats,
    pub group_count: usize,
    pub model_used: bool,
}

/// Run the full pipeline: ingest -> aggregate -> synthesize -> validate -> write.
///
/// With `offline` set the model is skipped entirely and root causes fall
/// back to deterministic evidence from the groups.
pub async fn run(config: &Config, inputs: &[PathBuf], offline: bool) -> Result<PipelineOutcome> {
    let transport = if offline {
        None
    } else {
        Some(build_transport(config)?)
    };
    run_with_transport(config, inputs, transport).await
}

/// Same as `run`, with the transport supplied by the caller (or None to
/// skip the model). This is the seam tests use to script model behavior.
pub async fn run_with_transport(
    config: &Config,
    inputs: &[PathBuf],
    transport: Option<Box<dyn ChatTransport>>,
) -> Result<PipelineOutcome> {
    let files = ingest::collect_input_files(inputs)?;
    info!(files = files.len(), "ingesting log files");

    let (aggregator, stats) = ingest::ingest_all(&files, &config.signature).await?;
    let total_events = aggregator.total_events();
    let groups = aggregator.finalize();
    info!(
        groups = groups.len(),
        events = total_events,
        skipped = stats.skipped_lines,
        "aggregation complete"
    );

    let model_used = transport.is_some() && !groups.is_empty();
    let candidates = match transport {
        Some(transport) if !groups.is_empty() => {
            let prompt =
                PromptBuilder::new(config.llm.max_prompt_groups).build(&groups, total_events);
            let synthesizer =
                Synthesizer::new(transport, chat_options(config)).with_retry(RetryPolicy {
                    max_attempts: config.llm.max_retries,
                    ..RetryPolicy::default()
                });
            // an unreachable model aborts the run before any artifact write
            synthesizer.synthesize(&prompt).await?
        }
        _ => Vec::new(),
    };
    if model_used && candidates.is_empty() {
        warn!("model produced no usable candidates; falling back to group evidence");
    }

    let findings = validate(&groups, candidates);
    let source_files: Vec<String> = files.iter().map(|p| p.display().to_string()).collect();
    let report = build_report(findings, &groups, source_files, Utc::now());

    let out_dir = &config.report.out_dir;
    let json_path = out_dir.join(FINDINGS_FILE);
    let markdown_path = out_dir.join(SUMMARY_FILE);
    storage::write_atomic(&json_path, &serde_json::to_string_pretty(&report)?)?;
    storage::write_atomic(&markdown_path, &render_markdown(&report))?;
    info!(
        json = %json_path.display(),
        markdown = %markdown_path.display(),
        "artifacts written"
    );

    Ok(PipelineOutcome {
        report,
        json_path,
        markdown_path,
        stats,
        group_count: groups.len(),
        model_used,
    })
}

fn build_transport(config: &Config) -> Result<Box<dyn ChatTransport>> {
    let llm = &config.llm;
    let transport = create_transport(
        &llm.provider,
        llm.resolved_base_url().as_deref(),
        llm.resolved_api_key().as_deref(),
    )?;
    Ok(transport)
}

fn chat_options(config: &Config) -> ChatOptions {
    ChatOptions {
        model: config.llm.model.clone(),
        temperature: config.llm.temperature,
        timeout: config.llm.timeout(),
    }
}
