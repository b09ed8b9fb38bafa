//! CLI command-name contract for logging spans.

use crate::cli::parse::Commands;

/// Command name recorded on the command span (e.g. "commit", "fetch").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Create { .. } => "create",
        Commands::Info { .. } => "info",
        Commands::Commit { .. } => "commit",
        Commands::Revert { .. } => "revert",
        Commands::Fetch { .. } => "fetch",
    }
}
