//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to the repository facade.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_change_report, format_commit_result, format_create_result, format_fetch_result,
    format_info, format_revert_result,
};
pub use route::{RunContext, TerminalConfirm};
