//! Merge rules: defaults, override order, conflict handling.

use crate::checklist::DEFAULT_CHECKLIST_FILE;
use crate::pipeline::DEFAULT_PARALLELISM;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources override earlier ones: defaults, global file, workspace
/// file, environment. CLI flags are applied after deserialization.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("checklist.path", DEFAULT_CHECKLIST_FILE)?
        .set_default("checklist.show_good", true)?
        .set_default("pipeline.parallelism", DEFAULT_PARALLELISM as i64)?
        .set_default("pipeline.strategy", "sharded")?
        .set_default("pipeline.algorithm", "md5")?
        .set_default("pipeline.on_error", "abort")?
        .set_default("pipeline.channel_capacity", 0i64)
}
