//! Manifest Store
//!
//! Layout and persistence of the control directory:
//!
//! ```text
//! .vcs/
//!   config.json              repository state
//!   settings.toml            optional workspace configuration
//!   commits/
//!     V00001_alice/
//!       .vcs                 commit manifest
//!       a.txt                content changed or added by this commit
//! ```

pub mod manifest;
pub mod persistence;
pub mod state;
pub mod tag;

pub use manifest::{CommitManifest, FetchMarker, FileRecord};
pub use state::{CommitPointer, RepositoryState};
pub use tag::{validate_name, CommitTag};

use crate::error::{StorageError, VcsError};
use crate::tree::path::key_to_relative;
use persistence::{read_json, write_json_atomic};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Name of the control directory inside a workspace.
pub const CONTROL_DIR_NAME: &str = ".vcs";
/// Repository state file inside the control directory.
pub const STATE_FILE: &str = "config.json";
/// Commit store directory inside the control directory.
pub const COMMITS_DIR: &str = "commits";
/// Manifest file inside each commit directory.
pub const MANIFEST_FILE: &str = ".vcs";
/// Optional workspace settings file inside the control directory.
pub const SETTINGS_FILE: &str = "settings.toml";

/// A repository's control directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlDir {
    root: PathBuf,
}

impl ControlDir {
    /// Control directory of the workspace rooted at `workspace_root`.
    pub fn for_workspace(workspace_root: &Path) -> Self {
        Self {
            root: workspace_root.join(CONTROL_DIR_NAME),
        }
    }

    /// Control directory at an explicit location.
    pub fn at(root: PathBuf) -> Self {
        Self { root }
    }

    /// Find an initialized control directory given either a workspace or a control root.
    pub fn locate(path: &Path) -> Option<Self> {
        let nested = Self::for_workspace(path);
        if nested.is_initialized() {
            return Some(nested);
        }
        let direct = Self::at(path.to_path_buf());
        if direct.is_initialized() {
            return Some(direct);
        }
        None
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join(STATE_FILE)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    pub fn commits_dir(&self) -> PathBuf {
        self.root.join(COMMITS_DIR)
    }

    pub fn commit_dir(&self, tag: &CommitTag) -> PathBuf {
        self.commits_dir().join(tag.to_string())
    }

    pub fn manifest_path(&self, tag: &CommitTag) -> PathBuf {
        self.commit_dir(tag).join(MANIFEST_FILE)
    }

    pub fn is_initialized(&self) -> bool {
        self.state_path().is_file()
    }

    /// Create the control directory, the commit store, and the initial state file.
    pub fn initialize(&self, state: &RepositoryState) -> Result<(), VcsError> {
        if self.root.exists() {
            return Err(VcsError::AlreadyInitialized(self.root.clone()));
        }
        let commits = self.commits_dir();
        fs::create_dir_all(&commits)
            .map_err(|e| StorageError::io("create directory", &commits, e))?;
        self.save_state(state)
    }

    pub fn load_state(&self) -> Result<RepositoryState, VcsError> {
        if !self.is_initialized() {
            return Err(VcsError::NotInitialized(self.root.clone()));
        }
        Ok(read_json(&self.state_path())?)
    }

    pub fn save_state(&self, state: &RepositoryState) -> Result<(), VcsError> {
        write_json_atomic(&self.state_path(), state)?;
        debug!(head = %state.head_label(), "Saved repository state");
        Ok(())
    }

    /// A commit exists once its manifest has been persisted.
    pub fn has_commit(&self, tag: &CommitTag) -> bool {
        self.manifest_path(tag).is_file()
    }

    pub fn load_manifest(&self, tag: &CommitTag) -> Result<CommitManifest, VcsError> {
        let path = self.manifest_path(tag);
        if !path.is_file() {
            return Err(VcsError::CommitNotFound(tag.to_string()));
        }
        Ok(read_json(&path)?)
    }

    pub fn save_manifest(&self, tag: &CommitTag, manifest: &CommitManifest) -> Result<(), VcsError> {
        write_json_atomic(&self.manifest_path(tag), manifest)?;
        Ok(())
    }

    /// Complete commits in the store, in tag order.
    ///
    /// Directories whose names are not tags (staging directories) and commit
    /// directories without a manifest (interrupted commits) are skipped.
    pub fn list_commits(&self) -> Result<Vec<CommitTag>, VcsError> {
        let commits_dir = self.commits_dir();
        if !commits_dir.is_dir() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&commits_dir)
            .map_err(|e| StorageError::io("read directory", &commits_dir, e))?;

        let mut tags = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::io("read directory", &commits_dir, e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let Ok(tag) = name.parse::<CommitTag>() else {
                debug!(entry = name, "Skipping non-commit entry in commit store");
                continue;
            };
            if self.has_commit(&tag) {
                tags.push(tag);
            } else {
                debug!(tag = %tag, "Skipping commit directory without manifest");
            }
        }
        tags.sort();
        Ok(tags)
    }

    /// Physical location of `key`'s content as recorded by `record`.
    pub fn content_path(&self, key: &str, record: &FileRecord) -> Result<PathBuf, VcsError> {
        let mut components = Path::new(&record.subdir).components();
        let single = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single {
            return Err(StorageError::InvalidPath(format!(
                "Record for {:?} names {:?}, which is not a commit directory",
                key, record.subdir
            ))
            .into());
        }
        Ok(self
            .commits_dir()
            .join(&record.subdir)
            .join(key_to_relative(key)?))
    }
}
