use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "logsift")]
#[command(about = "Turn noisy log files into a short list of probable root causes", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze log files and write findings artifacts
    Analyze {
        /// Log files or directories to scan
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory for the JSON and markdown artifacts
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// How many top groups to send to the model (0 sends all)
        #[arg(long)]
        max_groups: Option<usize>,

        /// Per-attempt model timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Model provider override (openai, ollama)
        #[arg(long)]
        provider: Option<String>,

        /// Model id override
        #[arg(long)]
        model: Option<String>,

        /// Skip the model call; derive root causes from group evidence only
        #[arg(long)]
        offline: bool,

        /// Print the JSON report to stdout instead of the rendered summary
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}
