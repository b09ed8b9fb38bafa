//! Error types for the vcontrol snapshot engine.

use crate::store::CommitTag;
use std::path::PathBuf;
use thiserror::Error;

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Failed to walk directory: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("Malformed JSON in {path:?}: {source}")]
    JsonError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StorageError {
    /// Wrap an I/O error with the path and action that produced it.
    pub fn io(action: &str, path: &std::path::Path, err: std::io::Error) -> Self {
        StorageError::IoError(std::io::Error::new(
            err.kind(),
            format!("Failed to {} {:?}: {}", action, path, err),
        ))
    }
}

/// Repository-level errors surfaced to the CLI.
#[derive(Debug, Error)]
pub enum VcsError {
    #[error("Repository has not been initialized, or isn't detected at {0:?}. Run 'vcontrol create <repo_name> <username>'")]
    NotInitialized(PathBuf),

    #[error("Repository already created at {0:?}")]
    AlreadyInitialized(PathBuf),

    #[error("Invalid {kind}: {value:?} (must be non-empty, without whitespace or path separators)")]
    InvalidName { kind: &'static str, value: String },

    #[error("Invalid commit tag: {0:?} (expected V<sequence>_<user>, e.g. V00001_alice)")]
    InvalidCommitTag(String),

    #[error("Commit not found: {0}")]
    CommitNotFound(String),

    #[error("No files exist to be committed.")]
    EmptyWorkingTree,

    #[error("No files have been changed and therefore there is nothing to commit.")]
    NothingToCommit,

    #[error("Commit {0} already exists in the commit store")]
    CommitExists(CommitTag),

    #[error("Missing snapshot content for {path} (expected at {location:?})")]
    MissingSnapshotContent { path: String, location: PathBuf },

    #[error("Fetch source is not a vcontrol repository: {0:?}")]
    FetchSourceNotFound(PathBuf),

    #[error("Cannot fetch a repository into itself: {0:?}")]
    SameRepository(PathBuf),

    #[error("Sequence collision: incoming commit {incoming} shares its sequence number with local commit {existing}")]
    SequenceCollision {
        incoming: CommitTag,
        existing: CommitTag,
    },

    #[error("Cannot move repository pointer from sequence {current} back to {target}")]
    PointerRegression { current: u64, target: CommitTag },

    #[error("{0}")]
    Cancelled(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
}

impl From<config::ConfigError> for VcsError {
    fn from(err: config::ConfigError) -> Self {
        VcsError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for VcsError {
    fn from(err: std::io::Error) -> Self {
        VcsError::StorageError(StorageError::IoError(err))
    }
}
