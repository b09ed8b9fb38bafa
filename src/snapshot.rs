//! Snapshot Writer
//!
//! Materializes a commit directory holding only changed or added content and
//! persists the manifest derived from the previous one.

use crate::diff::ChangeSet;
use crate::error::{StorageError, VcsError};
use crate::store::{CommitManifest, CommitTag, ControlDir, FetchMarker, FileRecord};
use crate::tree::leaf;
use crate::tree::path::key_to_relative;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Commit lifecycle. Any failure before `ManifestPersisted` leaves repository state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStage {
    Scanned,
    Classified,
    DirectoryWritten,
    ManifestPersisted,
    PointerAdvanced,
}

/// Derive the next manifest from `previous` without touching it.
///
/// Deleted paths are removed, changed or added paths point at `tag`, and every
/// other record is carried over unchanged so unchanged content keeps pointing at
/// the commit that first stored it.
pub fn derive_manifest(
    previous: &CommitManifest,
    changes: &ChangeSet,
    tag: &CommitTag,
    latest_fetch: FetchMarker,
) -> CommitManifest {
    let mut commits = previous.commits.clone();
    for key in &changes.deleted {
        commits.remove(key);
    }
    let record = FileRecord::for_commit(tag);
    for key in changes.changed_or_added() {
        commits.insert(key.clone(), record.clone());
    }
    CommitManifest {
        commits,
        latest_fetch,
    }
}

/// Writes new commit directories into a repository's commit store.
pub struct SnapshotWriter<'a> {
    workspace_root: &'a Path,
    control: &'a ControlDir,
}

impl<'a> SnapshotWriter<'a> {
    pub fn new(workspace_root: &'a Path, control: &'a ControlDir) -> Self {
        Self {
            workspace_root,
            control,
        }
    }

    /// Write commit `tag` and return its manifest.
    ///
    /// Fails with `NothingToCommit` before touching the disk when `changes` is empty.
    /// A failure after the directory is created leaves it behind without a manifest;
    /// such a directory is never listed as a commit and is cleared on the next attempt.
    pub fn write(
        &self,
        previous: &CommitManifest,
        changes: &ChangeSet,
        tag: &CommitTag,
        latest_fetch: FetchMarker,
    ) -> Result<CommitManifest, VcsError> {
        if changes.is_empty() {
            return Err(VcsError::NothingToCommit);
        }

        let commit_dir = self.control.commit_dir(tag);
        self.prepare_commit_dir(tag, &commit_dir)?;

        for key in changes.changed_or_added() {
            let rel = key_to_relative(key)?;
            let src = self.workspace_root.join(&rel);
            let dst = commit_dir.join(&rel);
            if let Some(parent) = dst.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| StorageError::io("create directory", parent, e))?;
            }
            leaf::copy(&src, &dst).map_err(|e| StorageError::io("copy", &src, e))?;
        }
        debug!(
            tag = %tag,
            stage = ?CommitStage::DirectoryWritten,
            copied = changes.changed_or_added_count(),
            "Wrote commit directory"
        );

        let manifest = derive_manifest(previous, changes, tag, latest_fetch);
        self.control.save_manifest(tag, &manifest)?;
        debug!(
            tag = %tag,
            stage = ?CommitStage::ManifestPersisted,
            entries = manifest.len(),
            "Persisted manifest"
        );
        Ok(manifest)
    }

    fn prepare_commit_dir(&self, tag: &CommitTag, commit_dir: &Path) -> Result<(), VcsError> {
        if self.control.has_commit(tag) {
            return Err(VcsError::CommitExists(tag.clone()));
        }
        if commit_dir.exists() {
            warn!(tag = %tag, "Clearing orphaned commit directory from an interrupted commit");
            fs::remove_dir_all(commit_dir)
                .map_err(|e| StorageError::io("remove directory", commit_dir, e))?;
        }
        fs::create_dir_all(commit_dir)
            .map_err(|e| StorageError::io("create directory", commit_dir, e))?;
        Ok(())
    }
}
