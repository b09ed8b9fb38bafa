//! Diff Engine
//!
//! Classifies the working file set against the previous commit's manifest.
//! Content is compared byte for byte; timestamps and permissions are never consulted.

use crate::error::{StorageError, VcsError};
use crate::store::{CommitManifest, ControlDir};
use crate::tree::leaf;
use crate::tree::path::key_to_relative;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

const COMPARE_CHUNK: usize = 64 * 1024;

/// How a path differs from the previous commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Addition,
    Change,
    Deletion,
}

/// One line of the change report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub path: String,
    pub kind: ChangeKind,
}

/// Disjoint classification of working-tree paths against a manifest.
///
/// `added` and `changed` together form the changed-or-added set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub unchanged: BTreeSet<String>,
    pub added: BTreeSet<String>,
    pub changed: BTreeSet<String>,
    pub deleted: BTreeSet<String>,
}

impl ChangeSet {
    /// True when nothing would be committed.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty() && self.deleted.is_empty()
    }

    pub fn changed_or_added(&self) -> impl Iterator<Item = &String> {
        self.added.iter().chain(self.changed.iter())
    }

    pub fn changed_or_added_count(&self) -> usize {
        self.added.len() + self.changed.len()
    }

    /// Change report sorted by path.
    pub fn report(&self) -> Vec<FileChange> {
        let mut lines: Vec<FileChange> = self
            .added
            .iter()
            .map(|p| (p, ChangeKind::Addition))
            .chain(self.changed.iter().map(|p| (p, ChangeKind::Change)))
            .chain(self.deleted.iter().map(|p| (p, ChangeKind::Deletion)))
            .map(|(path, kind)| FileChange {
                path: path.clone(),
                kind,
            })
            .collect();
        lines.sort_by(|a, b| a.path.cmp(&b.path));
        lines
    }
}

/// Classifies working files against a previous manifest.
pub struct DiffEngine<'a> {
    workspace_root: &'a Path,
    control: &'a ControlDir,
}

impl<'a> DiffEngine<'a> {
    pub fn new(workspace_root: &'a Path, control: &'a ControlDir) -> Self {
        Self {
            workspace_root,
            control,
        }
    }

    /// Classify `working` against `previous` (absent before the first commit).
    pub fn classify(
        &self,
        working: &BTreeSet<String>,
        previous: Option<&CommitManifest>,
    ) -> Result<ChangeSet, VcsError> {
        let mut changes = ChangeSet::default();

        let Some(previous) = previous else {
            changes.added = working.clone();
            return Ok(changes);
        };

        for key in working {
            match previous.get(key) {
                None => {
                    changes.added.insert(key.clone());
                }
                Some(record) => {
                    let committed = self.control.content_path(key, record)?;
                    if !leaf::exists(&committed) {
                        return Err(VcsError::MissingSnapshotContent {
                            path: key.clone(),
                            location: committed,
                        });
                    }
                    let working_path = self.workspace_root.join(key_to_relative(key)?);
                    let same = leaves_equal(&working_path, &committed)
                        .map_err(|e| StorageError::io("compare", &working_path, e))?;
                    if same {
                        changes.unchanged.insert(key.clone());
                    } else {
                        changes.changed.insert(key.clone());
                    }
                }
            }
        }

        changes.deleted = previous
            .paths()
            .filter(|key| !working.contains(*key))
            .cloned()
            .collect();

        debug!(
            unchanged = changes.unchanged.len(),
            added = changes.added.len(),
            changed = changes.changed.len(),
            deleted = changes.deleted.len(),
            "Classified working tree"
        );
        Ok(changes)
    }
}

/// Two symlinks are equal when their targets are; a symlink never equals a file.
fn leaves_equal(a: &Path, b: &Path) -> io::Result<bool> {
    match (leaf::link_target(a)?, leaf::link_target(b)?) {
        (None, None) => files_equal(a, b),
        (Some(target_a), Some(target_b)) => Ok(target_a == target_b),
        _ => Ok(false),
    }
}

/// Exact byte equality of two files.
pub fn files_equal(a: &Path, b: &Path) -> io::Result<bool> {
    let mut file_a = File::open(a)?;
    let mut file_b = File::open(b)?;
    if file_a.metadata()?.len() != file_b.metadata()?.len() {
        return Ok(false);
    }

    let mut buf_a = vec![0u8; COMPARE_CHUNK];
    let mut buf_b = vec![0u8; COMPARE_CHUNK];
    loop {
        let n = read_full(&mut file_a, &mut buf_a)?;
        let m = read_full(&mut file_b, &mut buf_b)?;
        if n != m || buf_a[..n] != buf_b[..m] {
            return Ok(false);
        }
        if n == 0 {
            return Ok(true);
        }
    }
}

/// Fill `buf` as far as the reader allows; returns bytes read (0 at EOF).
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
