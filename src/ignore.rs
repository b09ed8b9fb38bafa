//! Ignore set for working-tree scans.
//!
//! An explicit value naming the path components that are never part of the
//! working tree. The control directory is always in the set; callers add names
//! from configuration (`commit.ignore`) and from `commit --ignore`. A name matches
//! a path component exactly, at any depth.

use crate::store::CONTROL_DIR_NAME;
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Component, Path};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreSet {
    names: BTreeSet<String>,
}

impl IgnoreSet {
    /// Set containing only the control directory.
    pub fn new() -> Self {
        let mut names = BTreeSet::new();
        names.insert(CONTROL_DIR_NAME.to_string());
        Self { names }
    }

    /// Control directory plus `names`.
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        set.extend(names);
        set
    }

    /// Add a name. Trailing slashes (`target/`) are accepted and stripped.
    pub fn insert(&mut self, name: &str) {
        let name = name.trim_end_matches(['/', '\\']);
        if !name.is_empty() {
            self.names.insert(name.to_string());
        }
    }

    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.insert(name.as_ref());
        }
    }

    /// Whether a single file or directory name is ignored.
    pub fn is_ignored_name(&self, name: &OsStr) -> bool {
        name.to_str().is_some_and(|n| self.names.contains(n))
    }

    /// Whether any component of a relative path is ignored.
    pub fn is_ignored_path(&self, rel: &Path) -> bool {
        rel.components().any(|component| match component {
            Component::Normal(name) => self.is_ignored_name(name),
            _ => false,
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for IgnoreSet {
    fn default() -> Self {
        Self::new()
    }
}
