//! Config loading facade: assembles sources and deserializes the result.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::ChecklistConfig;
use crate::error::ApiError;
use config::File;
use std::path::Path;
use tracing::debug;

/// Entry points for building a `ChecklistConfig`.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults, global file, workspace file, then environment.
    pub fn load(workspace_root: &Path) -> Result<ChecklistConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: ChecklistConfig = builder.build()?.try_deserialize()?;
        debug!(workspace = %workspace_root.display(), "Configuration loaded");
        Ok(config)
    }

    /// Load defaults, the given file, then environment. The file must exist.
    pub fn load_from_file(path: &Path) -> Result<ChecklistConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        let builder = environment::add_to_builder(builder);

        let config: ChecklistConfig = builder.build()?.try_deserialize()?;
        debug!(config_path = %path.display(), "Configuration loaded from file");
        Ok(config)
    }
}
