//! Working-tree leaves: regular files and symlinks.
//!
//! A symlink is an opaque leaf. Its target path is stored and restored as-is and
//! never dereferenced, so dangling links and links to directories commit like files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Target of `path` when it is a symlink, `None` for anything else.
pub fn link_target(path: &Path) -> io::Result<Option<PathBuf>> {
    if fs::symlink_metadata(path)?.file_type().is_symlink() {
        fs::read_link(path).map(Some)
    } else {
        Ok(None)
    }
}

/// True when `path` is a regular file or a symlink (dangling or not).
pub fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|meta| meta.is_file() || meta.file_type().is_symlink())
        .unwrap_or(false)
}

/// Copy one leaf. Symlinks are recreated as links to the same target.
pub fn copy(src: &Path, dst: &Path) -> io::Result<()> {
    match link_target(src)? {
        Some(target) => make_symlink(&target, dst),
        None => fs::copy(src, dst).map(|_| ()),
    }
}

#[cfg(unix)]
fn make_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn make_symlink(target: &Path, link: &Path) -> io::Result<()> {
    let resolved = match link.parent() {
        Some(parent) => parent.join(target),
        None => target.to_path_buf(),
    };
    if resolved.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

#[cfg(not(any(unix, windows)))]
fn make_symlink(_target: &Path, link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("cannot create symlink {:?} on this platform", link),
    ))
}
