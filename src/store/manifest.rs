//! Commit manifests: working-tree path to the commit directory holding its bytes.

use crate::store::CommitTag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where one path's content lives, and which commit wrote it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Sequence of the commit that wrote this content.
    pub value: u64,
    /// Commit directory name inside the commit store.
    pub subdir: String,
    pub user: String,
}

impl FileRecord {
    pub fn for_commit(tag: &CommitTag) -> Self {
        Self {
            value: tag.sequence(),
            subdir: tag.to_string(),
            user: tag.user().to_string(),
        }
    }
}

/// Fetch marker copied into each manifest at commit time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchMarker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<String>,
}

impl FetchMarker {
    pub fn from_last_fetch(last_fetch: Option<&str>) -> Self {
        Self {
            fetched_at: last_fetch.map(str::to_string),
        }
    }
}

/// Persisted as `<commit dir>/.vcs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitManifest {
    pub commits: BTreeMap<String, FileRecord>,
    #[serde(default)]
    pub latest_fetch: FetchMarker,
}

impl CommitManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.commits.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.commits.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.commits.keys()
    }

    pub fn records(&self) -> impl Iterator<Item = (&String, &FileRecord)> {
        self.commits.iter()
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}
