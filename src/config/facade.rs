//! Config loader: builds the layered configuration and validates it.

use super::merge::merge_policy::builder_with_defaults;
use super::sources::{environment, global_file, workspace_file};
use super::VcontrolConfig;
use crate::error::VcsError;
use config::File;
use std::path::Path;
use tracing::debug;

/// Loads [`VcontrolConfig`] from its sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then the global file, then `.vcs/settings.toml`, then the environment.
    pub fn load(workspace_root: &Path) -> Result<VcontrolConfig, VcsError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: VcontrolConfig = builder.build()?.try_deserialize()?;
        Self::validated(config)
    }

    /// Defaults, then exactly `path`, then the environment.
    pub fn load_from_file(path: &Path) -> Result<VcontrolConfig, VcsError> {
        if !path.is_file() {
            return Err(VcsError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder = builder_with_defaults()?.add_source(File::from(path).required(true));
        let builder = environment::add_to_builder(builder);

        let config: VcontrolConfig = builder.build()?.try_deserialize()?;
        Self::validated(config)
    }

    fn validated(config: VcontrolConfig) -> Result<VcontrolConfig, VcsError> {
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            VcsError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        debug!(
            ignore = ?config.commit.ignore,
            confirm = config.ui.confirm,
            color = config.ui.color,
            "Loaded configuration"
        );
        Ok(config)
    }
}
