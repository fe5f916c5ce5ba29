use crate::output;
use anyhow::{Context, Result};
use logsift_runtime::Config;
use std::path::PathBuf;

/// Flag-level overrides applied on top of the loaded config.
#[derive(Debug, Default)]
pub struct Overrides {
    pub out_dir: Option<PathBuf>,
    pub max_groups: Option<usize>,
    pub timeout: Option<u64>,
    pub provider: Option<String>,
    pub model: Option<String>,
}

pub fn handle(
    config_path: Option<PathBuf>,
    inputs: Vec<PathBuf>,
    overrides: Overrides,
    offline: bool,
    json: bool,
) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(out_dir) = overrides.out_dir {
        config.report.out_dir = out_dir;
    }
    if let Some(max_groups) = overrides.max_groups {
        config.llm.max_prompt_groups = max_groups;
    }
    if let Some(timeout) = overrides.timeout {
        config.llm.timeout_s = timeout;
    }
    if let Some(provider) = overrides.provider {
        config.llm.provider = provider;
    }
    if let Some(model) = overrides.model {
        config.llm.model = model;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let outcome = runtime.block_on(logsift_runtime::run(&config, &inputs, offline))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.report)?);
    } else {
        output::print_outcome(&outcome);
    }
    Ok(())
}
