//! CLI parse: clap types for chkdigest. No behavior; definitions only.

use crate::pipeline::hasher::HashAlgorithm;
use crate::pipeline::pool::Strategy;
use crate::pipeline::FailurePolicy;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// chkdigest - create and verify content-integrity checklists
#[derive(Parser)]
#[command(name = "chkdigest")]
#[command(about = "Create or verify a digest checklist for a set of files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Checklist file location (default: checklist.chk)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Number of parallel digest workers
    #[arg(short = 'j', long, global = true)]
    pub jobs: Option<usize>,

    /// How paths are distributed across workers
    #[arg(long, value_enum, global = true)]
    pub strategy: Option<Strategy>,

    /// Digest algorithm
    #[arg(long, value_enum, global = true)]
    pub algorithm: Option<HashAlgorithm>,

    /// What to do when a file cannot be read
    #[arg(long, value_enum, global = true)]
    pub on_error: Option<FailurePolicy>,

    /// Report format
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub format: ReportFormat,

    /// Disable colored report output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Only list discrepancies when verifying
    #[arg(long, global = true)]
    pub problems_only: bool,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Hash the matched files and write a new checklist
    Create {
        /// Glob patterns selecting the files (e.g. "src/**/*")
        #[arg(required = true)]
        patterns: Vec<String>,
    },
    /// Hash the matched files and compare them with the checklist
    Verify {
        /// Glob patterns selecting the files (e.g. "src/**/*")
        #[arg(required = true)]
        patterns: Vec<String>,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}
