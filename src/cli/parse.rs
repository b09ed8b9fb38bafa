//! CLI parse: clap types for vcontrol. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// vcontrol CLI - Minimal local version control
#[derive(Parser)]
#[command(name = "vcontrol")]
#[command(about = "Sequential snapshots of a working directory, with revert and fetch")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, global = true, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (replaces the global and workspace config files)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (when output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Initialize a repository in the workspace
    Create {
        /// Repository name
        repo_name: String,
        /// User recorded as the committer of this repository's commits
        username: String,
    },
    /// Show the current commit tag and uncommitted changes
    Info {
        /// List tracked files with the commit holding each file's content
        #[arg(long)]
        files: bool,
    },
    /// Snapshot the working directory as a new commit
    Commit {
        /// File or directory names to leave out of this commit
        #[arg(long, num_args = 0..)]
        ignore: Vec<String>,
    },
    /// Reverts the working directory back to a previous commit
    Revert {
        /// Commit to revert the working directory to (e.g. V00001_alice)
        commit_tag: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Fetches commits from another repository
    Fetch {
        /// Workspace or control directory of the repository to fetch from
        dir: PathBuf,
        /// Revert to the fetched repository's latest commit afterwards
        #[arg(long)]
        revert_latest: bool,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}
