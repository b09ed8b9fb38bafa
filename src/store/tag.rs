//! Commit tags: `V` + zero-padded sequence + `_` + committer.

use crate::error::VcsError;
use std::fmt;
use std::str::FromStr;

/// Width of the zero-padded sequence in a rendered tag.
const SEQUENCE_WIDTH: usize = 5;

/// Identifies a commit directory. Orders by sequence, then committer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommitTag {
    sequence: u64,
    user: String,
}

impl CommitTag {
    pub fn new(sequence: u64, user: impl Into<String>) -> Self {
        Self {
            sequence,
            user: user.into(),
        }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

impl fmt::Display for CommitTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "V{:0width$}_{}",
            self.sequence,
            self.user,
            width = SEQUENCE_WIDTH
        )
    }
}

impl FromStr for CommitTag {
    type Err = VcsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || VcsError::InvalidCommitTag(s.to_string());
        let rest = s.strip_prefix('V').ok_or_else(invalid)?;
        let (digits, user) = rest.split_once('_').ok_or_else(invalid)?;
        if digits.len() < SEQUENCE_WIDTH || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let sequence = digits.parse::<u64>().map_err(|_| invalid())?;
        validate_name("commit tag user", user).map_err(|_| invalid())?;
        Ok(CommitTag::new(sequence, user))
    }
}

/// Validate a username or repository name.
///
/// Names end up in directory names, so separators and dot-segments are rejected.
pub fn validate_name(kind: &'static str, value: &str) -> Result<(), VcsError> {
    let bad = value.is_empty()
        || value == "."
        || value == ".."
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '/' || c == '\\' || c.is_control());
    if bad {
        return Err(VcsError::InvalidName {
            kind,
            value: value.to_string(),
        });
    }
    Ok(())
}
