use crate::{Error, Result};
use logsift_engine::{Aggregator, SignatureConfig, parse_line};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const LOG_EXTENSIONS: &[&str] = &["log", "txt", "out"];

/// Per-run ingestion counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestStats {
    pub files: usize,
    pub total_lines: u64,
    pub parsed_events: u64,
    pub skipped_lines: u64,
}

impl IngestStats {
    fn absorb(&mut self, other: IngestStats) {
        self.files += other.files;
        self.total_lines += other.total_lines;
        self.parsed_events += other.parsed_events;
        self.skipped_lines += other.skipped_lines;
    }
}

/// Expand files and directories into a sorted, deduplicated list of log
/// files. Directories are walked recursively for known log extensions.
pub fn collect_input_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
                let path = entry.path();
                if path.is_file() && has_log_extension(path) {
                    files.push(path.to_path_buf());
                }
            }
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            return Err(Error::InvalidInput(format!(
                "input not found: {}",
                input.display()
            )));
        }
    }

    files.sort();
    files.dedup();

    if files.is_empty() {
        return Err(Error::InvalidInput(
            "no log files found in the given inputs".to_string(),
        ));
    }
    Ok(files)
}

fn has_log_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| LOG_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Parse one file into its own aggregator. Unparsable lines are counted
/// and skipped, never fatal.
pub fn ingest_file(path: &Path, config: &SignatureConfig) -> Result<(Aggregator, IngestStats)> {
    let content = std::fs::read_to_string(path)?;
    let mut aggregator = Aggregator::new(config.clone());
    let mut stats = IngestStats {
        files: 1,
        ..Default::default()
    };

    for line in content.lines() {
        stats.total_lines += 1;
        match parse_line(line) {
            Some(event) => {
                aggregator.add(&event);
                stats.parsed_events += 1;
            }
            None => stats.skipped_lines += 1,
        }
    }

    debug!(
        path = %path.display(),
        events = stats.parsed_events,
        skipped = stats.skipped_lines,
        "ingested file"
    );
    Ok((aggregator, stats))
}

/// Aggregate all files concurrently, one blocking task per file.
///
/// Tasks share no mutable state; the merge below is the sole
/// synchronization point and is conflict-free by construction.
pub async fn ingest_all(
    files: &[PathBuf],
    config: &SignatureConfig,
) -> Result<(Aggregator, IngestStats)> {
    let tasks: Vec<_> = files
        .iter()
        .map(|path| {
            let path = path.clone();
            let config = config.clone();
            tokio::task::spawn_blocking(move || ingest_file(&path, &config))
        })
        .collect();

    let mut merged = Aggregator::new(config.clone());
    let mut totals = IngestStats::default();
    for joined in futures::future::join_all(tasks).await {
        let result =
            joined.map_err(|err| Error::InvalidOperation(format!("ingest task failed: {err}")))?;
        let (aggregator, stats) = result?;
        merged.merge(aggregator);
        totals.absorb(stats);
    }

    Ok((merged, totals))
}
