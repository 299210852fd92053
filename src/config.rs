//! Configuration System
//!
//! Layered configuration for checklist runs: built-in defaults, a global
//! user file, a workspace file, and `CHKDIGEST_*` environment variables.
//! CLI flags are applied on top by the binary.

use crate::checklist::ChecklistSettings;
use crate::logging::LoggingConfig;
use crate::pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::workspace_file::WORKSPACE_CONFIG_FILE;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChecklistConfig {
    /// Checklist file settings
    #[serde(default)]
    pub checklist: ChecklistSettings,

    /// Digest pipeline settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Checklist(String),
    Pipeline(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Checklist(msg) => write!(f, "Checklist: {}", msg),
            ValidationError::Pipeline(msg) => write!(f, "Pipeline: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ChecklistConfig {
    /// Validate the entire configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.checklist.path.as_os_str().is_empty() {
            errors.push(ValidationError::Checklist(
                "Checklist path cannot be empty".to_string(),
            ));
        }

        if let Err(e) = self.pipeline.validate() {
            errors.push(ValidationError::Pipeline(e));
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, crate::error::ApiError> {
        toml::to_string_pretty(self).map_err(|e| crate::error::ApiError::ConfigError(e.to_string()))
    }
}
