//! Conversions between filesystem paths and manifest keys

use crate::error::StorageError;
use std::path::{Component, Path, PathBuf};

/// Canonicalize a path for identity comparison (resolves symlinks, `..`, `.`).
pub fn canonicalize_path(path: &Path) -> Result<PathBuf, StorageError> {
    // Use dunce for cross-platform canonicalization
    dunce::canonicalize(path).map_err(|e| {
        StorageError::InvalidPath(format!("Failed to canonicalize {:?}: {}", path, e))
    })
}

/// Turn a working-tree-relative path into a manifest key (`/`-separated).
pub fn relative_to_key(rel: &Path) -> Result<String, StorageError> {
    let mut parts: Vec<&str> = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(name) => {
                let name = name.to_str().ok_or_else(|| {
                    StorageError::InvalidPath(format!("Path is not valid UTF-8: {:?}", rel))
                })?;
                parts.push(name);
            }
            Component::CurDir => continue,
            _ => {
                return Err(StorageError::InvalidPath(format!(
                    "{:?} is not a working-tree-relative path",
                    rel
                )))
            }
        }
    }
    if parts.is_empty() {
        return Err(StorageError::InvalidPath(format!("{:?} names no file", rel)));
    }
    Ok(parts.join("/"))
}

/// Turn a manifest key back into a relative path.
///
/// Keys come from manifests that may have been fetched from elsewhere, so anything
/// that could escape the directory it is joined onto is rejected.
pub fn key_to_relative(key: &str) -> Result<PathBuf, StorageError> {
    let mut path = PathBuf::new();
    for part in key.split('/') {
        if part.is_empty() || part == "." || part == ".." || part.contains('\\') {
            return Err(StorageError::InvalidPath(format!(
                "Manifest key {:?} is not a plain relative path",
                key
            )));
        }
        path.push(part);
    }
    if path.is_absolute() || path.components().count() != key.split('/').count() {
        return Err(StorageError::InvalidPath(format!(
            "Manifest key {:?} is not a plain relative path",
            key
        )));
    }
    Ok(path)
}
