//! Integration tests for the CLI route table

use crate::integration::test_utils::{read_tree, write_file};
use clap::Parser;
use tempfile::TempDir;
use vcontrol::cli::{map_error, Cli, Commands, RunContext};
use vcontrol::config::VcontrolConfig;
use vcontrol::{AssumeYes, VcsError};

/// Context with default settings and colors off, so output is plain text.
fn context(workspace: &TempDir) -> RunContext {
    let mut config = VcontrolConfig::default();
    config.ui.color = false;
    RunContext::with_config(workspace.path().to_path_buf(), config)
}

fn run(ctx: &RunContext, args: &[&str]) -> Result<String, VcsError> {
    let mut argv = vec!["vcontrol"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();
    let mut refuse = |_: &str| -> Result<bool, VcsError> { Ok(false) };
    ctx.execute_with(&cli.command, &mut refuse)
}

#[test]
fn test_create_info_commit_flow() {
    let ws = TempDir::new().unwrap();
    let ctx = context(&ws);

    let out = run(&ctx, &["create", "demo", "alice"]).unwrap();
    assert!(out.contains("V00000_alice"));
    assert!(matches!(
        run(&ctx, &["create", "demo", "alice"]),
        Err(VcsError::AlreadyInitialized(_))
    ));

    let out = run(&ctx, &["info"]).unwrap();
    assert!(out.contains("On commit tag V00000_alice"));
    assert!(out.contains("Working directory is clean - no changes."));

    write_file(ws.path(), "a.txt", "hello");
    let out = run(&ctx, &["info"]).unwrap();
    assert!(out.contains("  + addition: a.txt"));

    let out = run(&ctx, &["commit"]).unwrap();
    assert!(out.starts_with("Creating new commit V00000_alice --> V00001_alice"));
    assert!(out.contains("  + addition: a.txt"));
    assert!(out.ends_with("Changes successfully committed, on tag V00001_alice"));

    let out = run(&ctx, &["info", "--files"]).unwrap();
    assert!(out.contains("On commit tag V00001_alice"));
    assert!(out.contains("Tracked files"));
    assert!(out.contains("V00001_alice"));

    let err = run(&ctx, &["commit"]).unwrap_err();
    assert_eq!(
        map_error(&err),
        "No files have been changed and therefore there is nothing to commit."
    );
}

#[test]
fn test_commands_require_repository() {
    let ws = TempDir::new().unwrap();
    let ctx = context(&ws);
    for args in [
        vec!["info"],
        vec!["commit"],
        vec!["revert", "V00001_alice", "--yes"],
    ] {
        assert!(matches!(run(&ctx, &args), Err(VcsError::NotInitialized(_))));
    }
}

#[test]
fn test_revert_prompt_declined_and_yes_flag() {
    let ws = TempDir::new().unwrap();
    let ctx = context(&ws);
    run(&ctx, &["create", "demo", "alice"]).unwrap();
    write_file(ws.path(), "a.txt", "v1");
    run(&ctx, &["commit"]).unwrap();
    write_file(ws.path(), "a.txt", "v2");

    let err = run(&ctx, &["revert", "V00001_alice"]).unwrap_err();
    assert_eq!(map_error(&err), "Canceling revert.");
    assert_eq!(read_tree(ws.path())["a.txt"], b"v2");

    let out = run(&ctx, &["revert", "V00001_alice", "--yes"]).unwrap();
    assert!(out.contains("revert: a.txt | V00001_alice"));
    assert_eq!(read_tree(ws.path())["a.txt"], b"v1");
}

#[test]
fn test_confirm_disabled_in_config() {
    let ws = TempDir::new().unwrap();
    let mut config = VcontrolConfig::default();
    config.ui.color = false;
    config.ui.confirm = false;
    let ctx = RunContext::with_config(ws.path().to_path_buf(), config);

    run(&ctx, &["create", "demo", "alice"]).unwrap();
    write_file(ws.path(), "a.txt", "v1");
    run(&ctx, &["commit"]).unwrap();
    write_file(ws.path(), "extra.txt", "x");

    run(&ctx, &["revert", "V00001_alice"]).unwrap();
    assert!(!ws.path().join("extra.txt").exists());
}

#[test]
fn test_invalid_commit_tag() {
    let ws = TempDir::new().unwrap();
    let ctx = context(&ws);
    run(&ctx, &["create", "demo", "alice"]).unwrap();
    assert!(matches!(
        run(&ctx, &["revert", "latest", "--yes"]),
        Err(VcsError::InvalidCommitTag(_))
    ));
}

#[test]
fn test_commit_ignore_flag_and_config_ignore() {
    let ws = TempDir::new().unwrap();
    let ctx = context(&ws);
    run(&ctx, &["create", "demo", "alice"]).unwrap();
    write_file(ws.path(), "src/main.rs", "fn main() {}");
    write_file(ws.path(), ".git/HEAD", "ref: refs/heads/main");
    write_file(ws.path(), "build/out.o", "obj");

    let out = run(&ctx, &["commit", "--ignore", "build"]).unwrap();
    assert!(out.contains("addition: src/main.rs"));
    assert!(!out.contains(".git"));
    assert!(!out.contains("build"));
}

#[test]
fn test_fetch_command_output() {
    let bob_ws = TempDir::new().unwrap();
    let bob = context(&bob_ws);
    run(&bob, &["create", "demo", "bob"]).unwrap();
    write_file(bob_ws.path(), "b.txt", "bob");
    run(&bob, &["commit"]).unwrap();

    let alice_ws = TempDir::new().unwrap();
    let alice = context(&alice_ws);
    run(&alice, &["create", "demo", "alice"]).unwrap();

    let source = bob_ws.path().to_string_lossy().into_owned();
    let out = run(&alice, &["fetch", &source]).unwrap();
    assert!(out.contains("+ fetched: V00001_bob"));

    let out = run(&alice, &["fetch", &source]).unwrap();
    assert!(out.contains("No new commits."));
    assert!(out.contains("= present: V00001_bob"));

    // declined prompt through the route table
    let err = run(&alice, &["fetch", &source, "--revert-latest"]).unwrap_err();
    assert_eq!(map_error(&err), "Canceling fetch.");

    let cli = Cli::try_parse_from(["vcontrol", "fetch", source.as_str(), "--revert-latest"])
        .unwrap();
    assert!(matches!(cli.command, Commands::Fetch { revert_latest: true, .. }));
    let out = alice.execute_with(&cli.command, &mut AssumeYes).unwrap();
    assert!(out.contains("revert: b.txt | V00001_bob"));
    assert_eq!(read_tree(alice_ws.path())["b.txt"], b"bob");
}
