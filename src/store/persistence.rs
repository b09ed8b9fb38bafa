//! JSON persistence for repository state and commit manifests

use crate::error::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Read and deserialize a JSON document.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let bytes = fs::read(path).map_err(|e| StorageError::io("read", path, e))?;
    serde_json::from_slice(&bytes).map_err(|source| StorageError::JsonError {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize with 4-space indentation and a trailing newline.
pub fn to_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Write a JSON document by writing a sibling temp file and renaming it over `path`.
///
/// Readers observe either the old document or the new one, never a torn write.
/// The rename is only as atomic as the underlying filesystem makes it.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let parent = path.parent().ok_or_else(|| {
        StorageError::InvalidPath(format!("{:?} has no parent directory", path))
    })?;
    fs::create_dir_all(parent).map_err(|e| StorageError::io("create directory", parent, e))?;

    let bytes = to_json_bytes(value).map_err(|source| StorageError::JsonError {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| StorageError::io("create temp file in", parent, e))?;
    tmp.write_all(&bytes)
        .map_err(|e| StorageError::io("write", path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| StorageError::io("sync", path, e))?;
    tmp.persist(path)
        .map_err(|e| StorageError::io("replace", path, e.error))?;
    Ok(())
}
