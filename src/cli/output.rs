//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::VcsError;

/// Map domain errors to a message for stderr.
pub fn map_error(e: &VcsError) -> String {
    match e {
        VcsError::CommitNotFound(tag) => format!(
            "Commit {} does not exist. Run 'vcontrol info' to see the current commit tag.",
            tag
        ),
        VcsError::SequenceCollision { .. } => format!(
            "{}. Fetch aborted; nothing was copied.",
            e
        ),
        _ => e.to_string(),
    }
}
