//! Working-tree walker: enumerates file paths relative to the workspace root.

use crate::error::StorageError;
use crate::ignore::IgnoreSet;
use crate::tree::path::relative_to_key;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::debug;
use walkdir::WalkDir;

/// Filesystem walker configuration
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Names pruned at any depth; always includes the control directory.
    pub ignore: IgnoreSet,
}

impl WalkerConfig {
    pub fn with_ignore(ignore: IgnoreSet) -> Self {
        Self { ignore }
    }
}

/// Filesystem walker
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// Walk the working tree and collect manifest keys of every non-directory entry.
    ///
    /// Symlinks are never followed; a symlink is reported as a leaf like a file.
    /// Ignored names prune whole subtrees. Returned keys are sorted.
    pub fn walk(&self) -> Result<BTreeSet<String>, StorageError> {
        let mut files = BTreeSet::new();
        let ignore = &self.config.ignore;

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !ignore.is_ignored_name(entry.file_name()));

        for entry in walker {
            let entry = entry?;
            if entry.depth() == 0 || entry.file_type().is_dir() {
                continue;
            }
            let rel = entry.path().strip_prefix(&self.root).map_err(|_| {
                StorageError::InvalidPath(format!(
                    "{:?} is outside of {:?}",
                    entry.path(),
                    self.root
                ))
            })?;
            files.insert(relative_to_key(rel)?);
        }

        debug!(root = %self.root.display(), files = files.len(), "Scanned working tree");
        Ok(files)
    }
}
