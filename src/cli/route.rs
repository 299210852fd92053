//! CLI route: config resolution, run context, and command dispatch.

use crate::cli::parse::{Cli, Commands, ReportFormat};
use crate::cli::presentation::{format_create_outcome, format_verify_outcome, ReportOptions};
use crate::config::{ChecklistConfig, ConfigLoader};
use crate::error::ApiError;
use crate::service::ChecklistService;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Rendered command result plus whether the process should exit successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub text: String,
    pub success: bool,
}

/// Load configuration for `cli` and apply its flags on top.
///
/// Precedence: CLI flags, then environment, then workspace file, then
/// global file, then defaults.
pub fn load_config(cli: &Cli, workspace_root: &Path) -> Result<ChecklistConfig, ApiError> {
    let mut config = match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load(workspace_root)?,
    };
    apply_overrides(cli, &mut config);

    config.validate().map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        ApiError::ConfigError(format!(
            "Configuration validation failed:\n{}",
            error_msgs.join("\n")
        ))
    })?;
    Ok(config)
}

fn apply_overrides(cli: &Cli, config: &mut ChecklistConfig) {
    if let Some(ref output) = cli.output {
        config.checklist.path = output.clone();
    }
    if cli.problems_only {
        config.checklist.show_good = false;
    }
    if let Some(jobs) = cli.jobs {
        config.pipeline.parallelism = jobs;
    }
    if let Some(strategy) = cli.strategy {
        config.pipeline.strategy = strategy;
    }
    if let Some(algorithm) = cli.algorithm {
        config.pipeline.algorithm = algorithm;
    }
    if let Some(on_error) = cli.on_error {
        config.pipeline.on_error = on_error;
    }

    let logging = &mut config.logging;
    if cli.quiet {
        logging.level = "off".to_string();
    }
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        logging.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        logging.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        logging.file = Some(file.clone());
        if cli.log_output.is_none() {
            logging.output = "file".to_string();
        }
    }
    if cli.no_color {
        logging.color = false;
    }
}

/// Runtime context for CLI execution: effective config and report options.
pub struct RunContext {
    service: ChecklistService,
    report: ReportOptions,
}

impl RunContext {
    pub fn new(config: ChecklistConfig, format: ReportFormat, color: bool) -> Self {
        let report = ReportOptions {
            format,
            color,
            show_good: config.checklist.show_good,
        };
        Self {
            service: ChecklistService::new(config),
            report,
        }
    }

    /// Build a context from parsed CLI arguments and an already-loaded config.
    pub fn from_cli(cli: &Cli, config: ChecklistConfig) -> Self {
        let color = !cli.no_color && std::env::var_os("NO_COLOR").is_none();
        Self::new(config, cli.format, color)
    }

    pub fn service(&self) -> &ChecklistService {
        &self.service
    }

    pub fn execute(&self, command: &Commands) -> Result<RunOutput, ApiError> {
        let started = Instant::now();
        let output = match command {
            Commands::Create { patterns } => {
                let outcome = self.service.create(patterns)?;
                RunOutput {
                    text: format_create_outcome(&outcome, patterns, &self.report)?,
                    success: true,
                }
            }
            Commands::Verify { patterns } => {
                let outcome = self.service.verify(patterns)?;
                RunOutput {
                    text: format_verify_outcome(
                        &outcome,
                        patterns,
                        self.service.checklist_path(),
                        &self.report,
                    )?,
                    success: outcome.passed(),
                }
            }
            Commands::Config => RunOutput {
                text: self.service.config().to_toml()?,
                success: true,
            },
        };
        info!(
            success = output.success,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        Ok(output)
    }
}
