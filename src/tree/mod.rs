//! Working tree access
//!
//! Enumerates the live file tree, maps its paths to manifest keys, and copies leaves.

pub mod leaf;
pub mod path;
pub mod walker;
