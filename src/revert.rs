//! Reverter
//!
//! Replaces the working tree with the file set recorded in a manifest. Every
//! record is resolved before anything is removed; once the clear starts there is
//! no rollback, so an I/O failure during restore leaves a partial tree.

use crate::error::{StorageError, VcsError};
use crate::store::{CommitManifest, ControlDir, CONTROL_DIR_NAME};
use crate::tree::leaf;
use crate::tree::path::key_to_relative;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One restored path and the commit directory its content came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredFile {
    pub path: String,
    pub subdir: String,
}

struct RestorePlan {
    restored: RestoredFile,
    source: PathBuf,
    destination: PathBuf,
}

/// Rewrites a workspace to match a manifest.
pub struct Reverter<'a> {
    workspace_root: &'a Path,
    control: &'a ControlDir,
}

impl<'a> Reverter<'a> {
    pub fn new(workspace_root: &'a Path, control: &'a ControlDir) -> Self {
        Self {
            workspace_root,
            control,
        }
    }

    /// Make the working tree's file set exactly the key set of `target`.
    pub fn revert(&self, target: &CommitManifest) -> Result<Vec<RestoredFile>, VcsError> {
        let plan = self.plan(target)?;

        let removed = self.clear_working_tree()?;
        debug!(removed, "Cleared working tree");

        let mut restored = Vec::with_capacity(plan.len());
        for item in plan {
            if let Some(parent) = item.destination.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| StorageError::io("create directory", parent, e))?;
            }
            leaf::copy(&item.source, &item.destination)
                .map_err(|e| StorageError::io("restore", &item.destination, e))?;
            restored.push(item.restored);
        }
        info!(restored = restored.len(), "Restored working tree");
        Ok(restored)
    }

    /// Resolve every record's content; a dangling record aborts before any mutation.
    fn plan(&self, target: &CommitManifest) -> Result<Vec<RestorePlan>, VcsError> {
        target
            .records()
            .map(|(key, record)| {
                let source = self.control.content_path(key, record)?;
                if !leaf::exists(&source) {
                    return Err(VcsError::MissingSnapshotContent {
                        path: key.clone(),
                        location: source,
                    });
                }
                Ok(RestorePlan {
                    restored: RestoredFile {
                        path: key.clone(),
                        subdir: record.subdir.clone(),
                    },
                    source,
                    destination: self.workspace_root.join(key_to_relative(key)?),
                })
            })
            .collect()
    }

    /// Remove every top-level entry except the control directory.
    fn clear_working_tree(&self) -> Result<usize, VcsError> {
        let root = self.workspace_root;
        let entries =
            fs::read_dir(root).map_err(|e| StorageError::io("read directory", root, e))?;
        let mut removed = 0;
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::io("read directory", root, e))?;
            if entry.file_name() == CONTROL_DIR_NAME {
                continue;
            }
            let path = entry.path();
            // symlinks are removed as links, never followed
            let file_type = entry
                .file_type()
                .map_err(|e| StorageError::io("inspect", &path, e))?;
            if file_type.is_dir() {
                fs::remove_dir_all(&path)
                    .map_err(|e| StorageError::io("remove directory", &path, e))?;
            } else {
                fs::remove_file(&path).map_err(|e| StorageError::io("remove", &path, e))?;
            }
            removed += 1;
        }
        Ok(removed)
    }
}
