//! Repository state: name, owner, last-commit pointer, last-fetch marker.

use crate::error::VcsError;
use crate::store::CommitTag;
use serde::{Deserialize, Serialize};

/// Pointer to the last commit. `value == 0` means no commits yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitPointer {
    pub user: String,
    pub value: u64,
}

/// Persisted as `.vcs/config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryState {
    pub repo_name: String,
    pub user: String,
    #[serde(default)]
    pub last_fetch: Option<String>,
    pub last_commit: CommitPointer,
}

impl RepositoryState {
    pub fn new(repo_name: impl Into<String>, user: impl Into<String>) -> Self {
        let user = user.into();
        Self {
            repo_name: repo_name.into(),
            last_fetch: None,
            last_commit: CommitPointer {
                user: user.clone(),
                value: 0,
            },
            user,
        }
    }

    /// Tag of the last commit, or `None` before the first commit.
    pub fn head(&self) -> Option<CommitTag> {
        if self.last_commit.value == 0 {
            None
        } else {
            Some(CommitTag::new(
                self.last_commit.value,
                self.last_commit.user.clone(),
            ))
        }
    }

    /// Rendered head tag; `V00000_<user>` before the first commit.
    pub fn head_label(&self) -> String {
        CommitTag::new(self.last_commit.value, self.last_commit.user.clone()).to_string()
    }

    /// Tag the next commit by this repository's user will receive.
    ///
    /// `highest_stored` is the largest sequence in the commit store. Fetched commits
    /// can sit above the pointer, and a sequence number is never handed out twice.
    pub fn next_tag(&self, highest_stored: u64) -> CommitTag {
        let sequence = self.last_commit.value.max(highest_stored) + 1;
        CommitTag::new(sequence, self.user.clone())
    }

    /// Move the pointer to `tag`. The sequence never goes backwards.
    pub fn advance_to(&mut self, tag: &CommitTag) -> Result<(), VcsError> {
        if tag.sequence() < self.last_commit.value {
            return Err(VcsError::PointerRegression {
                current: self.last_commit.value,
                target: tag.clone(),
            });
        }
        self.last_commit = CommitPointer {
            user: tag.user().to_string(),
            value: tag.sequence(),
        };
        Ok(())
    }
}
