//! CLI route: single route table and run context. Dispatches to the repository
//! facade and presentation.

use crate::cli::help::command_name;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_commit_result, format_create_result, format_fetch_result, format_info,
    format_revert_result,
};
use crate::config::{ConfigLoader, VcontrolConfig};
use crate::error::VcsError;
use crate::repository::{AssumeYes, Confirmation, Repository};
use crate::store::CommitTag;
use std::path::{Path, PathBuf};
use tracing::{debug, info_span};

/// Interactive yes/no prompt on the terminal; defaults to No.
pub struct TerminalConfirm;

impl Confirmation for TerminalConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool, VcsError> {
        use dialoguer::Confirm;
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| VcsError::Cancelled(format!("Failed to get user input: {}", e)))
    }
}

/// Runtime context for CLI execution: workspace and loaded configuration.
pub struct RunContext {
    workspace_root: PathBuf,
    config: VcontrolConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, VcsError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Ok(Self::with_config(workspace_root, config))
    }

    /// Context with an already loaded configuration.
    pub fn with_config(workspace_root: PathBuf, config: VcontrolConfig) -> Self {
        Self {
            workspace_root,
            config,
        }
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config(&self) -> &VcontrolConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, VcsError> {
        let mut confirm = TerminalConfirm;
        self.execute_with(command, &mut confirm)
    }

    /// Execute with a caller-supplied confirmation source.
    pub fn execute_with(
        &self,
        command: &Commands,
        confirm: &mut dyn Confirmation,
    ) -> Result<String, VcsError> {
        let _span = info_span!("command", name = command_name(command)).entered();
        debug!(workspace = %self.workspace_root.display(), "Executing command");
        let color = self.config.ui.color;
        let mut assume_yes = AssumeYes;

        match command {
            Commands::Create {
                repo_name,
                username,
            } => {
                let repo = Repository::create(&self.workspace_root, repo_name, username)?;
                let state = repo.state()?;
                Ok(format_create_result(
                    &state.repo_name,
                    &state.user,
                    &state.head_label(),
                ))
            }
            Commands::Info { files } => {
                let repo = self.open()?;
                let info = repo.info(&self.config.commit.ignore_set(&[]))?;
                Ok(format_info(&info, *files, color))
            }
            Commands::Commit { ignore } => {
                let repo = self.open()?;
                let result = repo.commit(&self.config.commit.ignore_set(ignore))?;
                Ok(format_commit_result(&result, color))
            }
            Commands::Revert { commit_tag, yes } => {
                let repo = self.open()?;
                let tag: CommitTag = commit_tag.parse()?;
                let confirm: &mut dyn Confirmation = if *yes || !self.config.ui.confirm {
                    &mut assume_yes
                } else {
                    confirm
                };
                let result = repo.revert(&tag, confirm)?;
                Ok(format_revert_result(&result, color))
            }
            Commands::Fetch {
                dir,
                revert_latest,
                yes,
            } => {
                let repo = self.open()?;
                let confirm: &mut dyn Confirmation = if *yes || !self.config.ui.confirm {
                    &mut assume_yes
                } else {
                    confirm
                };
                let result = repo.fetch(dir, *revert_latest, confirm)?;
                Ok(format_fetch_result(&result, color))
            }
        }
    }

    fn open(&self) -> Result<Repository, VcsError> {
        Repository::open(&self.workspace_root)
    }
}
