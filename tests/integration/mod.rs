//! Integration tests for the vcontrol snapshot engine

mod cli_commands;
mod fetch_commits;
mod test_utils;
