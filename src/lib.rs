//! vcontrol: Minimal Local Version Control
//!
//! Snapshots a working directory into sequentially numbered commits, detects
//! which files changed since the last commit, reconstructs the tree at any prior
//! commit, and imports commit history from another repository on disk.
//!
//! Unchanged files are never copied again: a commit's manifest keeps pointing at
//! the commit directory that first stored each file's content.

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod fetch;
pub mod ignore;
pub mod logging;
pub mod repository;
pub mod revert;
pub mod snapshot;
pub mod store;
pub mod tree;

pub use error::{StorageError, VcsError};
pub use repository::{AssumeYes, Confirmation, Repository};
pub use store::CommitTag;
