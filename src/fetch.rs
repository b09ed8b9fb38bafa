//! Fetcher
//!
//! Imports commit directories from another repository's commit store. Directories
//! are copied verbatim; manifests are never rewritten. Commits already present
//! locally (by tag) are skipped. An incoming commit whose sequence number is
//! already used by a different local commit rejects the whole fetch before
//! anything is copied, as does an incoming manifest record whose content the
//! source repository does not hold.

use crate::error::{StorageError, VcsError};
use crate::store::{CommitTag, ControlDir};
use crate::tree::leaf;
use crate::tree::path::canonicalize_path;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Prefix of staging directories inside the commit store.
const STAGING_PREFIX: &str = ".incoming-";

/// What a fetch would do, computed without touching the local repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    pub source: PathBuf,
    /// Commits to copy, in tag order.
    pub incoming: Vec<CommitTag>,
    /// Commits already present locally.
    pub skipped: Vec<CommitTag>,
    /// The foreign repository's last commit, if it has one.
    pub foreign_head: Option<CommitTag>,
}

/// Copies commit directories between two control directories.
pub struct Fetcher<'a> {
    local: &'a ControlDir,
}

impl<'a> Fetcher<'a> {
    pub fn new(local: &'a ControlDir) -> Self {
        Self { local }
    }

    /// Validate the foreign repository and work out which commits to import.
    pub fn plan(&self, foreign: &ControlDir) -> Result<FetchPlan, VcsError> {
        let local_root = canonicalize_path(self.local.root())?;
        let foreign_root = canonicalize_path(foreign.root())?;
        if local_root == foreign_root {
            return Err(VcsError::SameRepository(foreign_root));
        }

        let foreign_state = foreign.load_state()?;
        let foreign_head = foreign_state.head();
        if let Some(head) = &foreign_head {
            if !foreign.has_commit(head) {
                return Err(VcsError::CommitNotFound(head.to_string()));
            }
        }

        let mut by_sequence: BTreeMap<u64, CommitTag> = self
            .local
            .list_commits()?
            .into_iter()
            .map(|tag| (tag.sequence(), tag))
            .collect();

        let mut incoming = Vec::new();
        let mut skipped = Vec::new();
        for tag in foreign.list_commits()? {
            if self.local.has_commit(&tag) {
                skipped.push(tag);
                continue;
            }
            if let Some(existing) = by_sequence.get(&tag.sequence()) {
                return Err(VcsError::SequenceCollision {
                    incoming: tag,
                    existing: existing.clone(),
                });
            }
            by_sequence.insert(tag.sequence(), tag.clone());
            incoming.push(tag);
        }

        for tag in &incoming {
            check_content(foreign, tag)?;
        }

        debug!(
            source = %foreign.root().display(),
            incoming = incoming.len(),
            skipped = skipped.len(),
            "Planned fetch"
        );
        Ok(FetchPlan {
            source: foreign_root,
            incoming,
            skipped,
            foreign_head,
        })
    }

    /// Copy every planned commit into the local commit store.
    ///
    /// Each commit is copied into a staging directory and renamed into place, so
    /// an interrupted fetch never leaves a partial commit under its tag.
    pub fn apply(&self, foreign: &ControlDir, plan: &FetchPlan) -> Result<(), VcsError> {
        for tag in &plan.incoming {
            self.import(foreign, tag)?;
            info!(tag = %tag, "Imported commit");
        }
        Ok(())
    }

    fn import(&self, foreign: &ControlDir, tag: &CommitTag) -> Result<(), VcsError> {
        let target = self.local.commit_dir(tag);
        if target.exists() {
            warn!(tag = %tag, "Replacing orphaned commit directory with fetched commit");
            fs::remove_dir_all(&target)
                .map_err(|e| StorageError::io("remove directory", &target, e))?;
        }

        let staging = self
            .local
            .commits_dir()
            .join(format!("{}{}", STAGING_PREFIX, tag));
        if staging.exists() {
            fs::remove_dir_all(&staging)
                .map_err(|e| StorageError::io("remove directory", &staging, e))?;
        }

        let files = copy_dir_all(&foreign.commit_dir(tag), &staging)?;
        fs::rename(&staging, &target).map_err(|e| StorageError::io("rename", &staging, e))?;
        debug!(tag = %tag, files, "Copied commit directory");
        Ok(())
    }
}

/// Every record in the commit's manifest must point at content the foreign
/// repository actually holds.
fn check_content(foreign: &ControlDir, tag: &CommitTag) -> Result<(), VcsError> {
    let manifest = foreign.load_manifest(tag)?;
    for (key, record) in &manifest.commits {
        let location = foreign.content_path(key, record)?;
        if !leaf::exists(&location) {
            return Err(VcsError::MissingSnapshotContent {
                path: key.clone(),
                location,
            });
        }
    }
    Ok(())
}

/// Recursively copy `src` to `dst`, returning the number of files copied.
pub fn copy_dir_all(src: &Path, dst: &Path) -> Result<usize, StorageError> {
    let mut files = 0;
    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry?;
        let rel = entry.path().strip_prefix(src).map_err(|_| {
            StorageError::InvalidPath(format!("{:?} is outside of {:?}", entry.path(), src))
        })?;
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .map_err(|e| StorageError::io("create directory", &target, e))?;
        } else {
            leaf::copy(entry.path(), &target)
                .map_err(|e| StorageError::io("copy", entry.path(), e))?;
            files += 1;
        }
    }
    Ok(files)
}
