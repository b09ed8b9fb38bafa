//! Workspace config file source: `.vcs/settings.toml`

use crate::store::ControlDir;
use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::Path;

/// Add the workspace settings file to the builder if it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let settings_path = ControlDir::for_workspace(workspace_root).settings_path();
    if settings_path.is_file() {
        return Ok(builder.add_source(File::from(settings_path.as_path()).required(false)));
    }
    Ok(builder)
}
