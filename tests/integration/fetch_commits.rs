//! Integration tests for fetch between two repositories on disk

use crate::integration::test_utils::{init_repo, read_tree, write_file};
use vcontrol::ignore::IgnoreSet;
use vcontrol::store::CommitTag;
use vcontrol::{AssumeYes, Repository, VcsError};

/// Foreign repository for `bob` with two commits.
fn bob_with_history() -> (tempfile::TempDir, Repository) {
    let (dir, repo) = init_repo("bob");
    write_file(dir.path(), "readme.md", "hi");
    repo.commit(&IgnoreSet::new()).unwrap();
    write_file(dir.path(), "src/lib.rs", "pub fn f() {}");
    repo.commit(&IgnoreSet::new()).unwrap();
    (dir, repo)
}

#[test]
fn test_fetch_imports_commits_verbatim() {
    let (_bob_dir, bob) = bob_with_history();
    let (_alice_dir, alice) = init_repo("alice");

    let result = alice
        .fetch(bob.root(), false, &mut AssumeYes)
        .unwrap();
    assert_eq!(result.plan.incoming.len(), 2);
    assert!(result.reverted.is_none());

    assert_eq!(alice.commits().unwrap(), bob.commits().unwrap());
    for tag in bob.commits().unwrap() {
        assert_eq!(alice.manifest(&tag).unwrap(), bob.manifest(&tag).unwrap());
    }
    let state = alice.state().unwrap();
    assert!(state.last_fetch.is_some());
    // pointer untouched without --revert-latest
    assert_eq!(state.head_label(), "V00000_alice");
}

#[test]
fn test_fetch_accepts_control_directory() {
    let (_bob_dir, bob) = bob_with_history();
    let (_alice_dir, alice) = init_repo("alice");
    let result = alice
        .fetch(bob.control().root(), false, &mut AssumeYes)
        .unwrap();
    assert_eq!(result.plan.incoming.len(), 2);
}

#[test]
fn test_fetch_twice_skips_present() {
    let (_bob_dir, bob) = bob_with_history();
    let (_alice_dir, alice) = init_repo("alice");
    alice.fetch(bob.root(), false, &mut AssumeYes).unwrap();

    let again = alice.fetch(bob.root(), false, &mut AssumeYes).unwrap();
    assert!(again.plan.incoming.is_empty());
    assert_eq!(again.plan.skipped.len(), 2);
}

#[test]
fn test_fetch_with_revert_latest() {
    let (bob_dir, bob) = bob_with_history();
    let (alice_dir, alice) = init_repo("alice");
    write_file(alice_dir.path(), "local.txt", "uncommitted");

    let result = alice.fetch(bob.root(), true, &mut AssumeYes).unwrap();
    let reverted = result.reverted.unwrap();
    assert_eq!(reverted.tag, CommitTag::new(2, "bob"));

    assert_eq!(read_tree(alice_dir.path()), read_tree(bob_dir.path()));
    let state = alice.state().unwrap();
    assert_eq!(state.head(), Some(CommitTag::new(2, "bob")));

    // alice keeps committing after bob's history under her own name
    write_file(alice_dir.path(), "readme.md", "hello from alice");
    let next = alice.commit(&IgnoreSet::new()).unwrap();
    assert_eq!(next.tag.to_string(), "V00003_alice");
    assert_eq!(next.changes.changed.len(), 1);
    // src/lib.rs still points into bob's fetched commit
    assert_eq!(
        next.manifest.get("src/lib.rs").map(|r| r.subdir.as_str()),
        Some("V00002_bob")
    );
}

#[test]
fn test_fetch_with_revert_declined_copies_nothing() {
    let (_bob_dir, bob) = bob_with_history();
    let (alice_dir, alice) = init_repo("alice");
    write_file(alice_dir.path(), "local.txt", "uncommitted");

    let mut decline = |_: &str| -> Result<bool, VcsError> { Ok(false) };
    let err = alice.fetch(bob.root(), true, &mut decline).unwrap_err();
    assert!(matches!(err, VcsError::Cancelled(_)));
    assert!(alice.commits().unwrap().is_empty());
    assert!(alice.state().unwrap().last_fetch.is_none());
    assert!(alice_dir.path().join("local.txt").exists());
}

#[test]
fn test_fetch_rejects_sequence_collision() {
    let (_bob_dir, bob) = bob_with_history();
    let (alice_dir, alice) = init_repo("alice");
    write_file(alice_dir.path(), "mine.txt", "alice");
    alice.commit(&IgnoreSet::new()).unwrap();

    let err = alice.fetch(bob.root(), false, &mut AssumeYes).unwrap_err();
    assert!(matches!(err, VcsError::SequenceCollision { .. }));
    assert_eq!(alice.commits().unwrap(), vec![CommitTag::new(1, "alice")]);
}

#[test]
fn test_fetch_with_revert_rejects_pointer_regression() {
    let (_bob_dir, bob) = init_repo("bob");
    write_file(bob.root(), "b.txt", "bob");
    bob.commit(&IgnoreSet::new()).unwrap();

    // alice's pointer is already past bob's head, on a sequence bob never used
    let (alice_dir, alice) = init_repo("alice");
    let mut state = alice.state().unwrap();
    state.advance_to(&CommitTag::new(5, "carol")).unwrap();
    alice.control().save_state(&state).unwrap();
    write_file(alice_dir.path(), "a.txt", "alice");

    let err = alice.fetch(bob.root(), true, &mut AssumeYes).unwrap_err();
    assert!(matches!(err, VcsError::PointerRegression { current: 5, .. }));
    assert!(alice.commits().unwrap().is_empty());
}

#[test]
fn test_fetch_missing_source() {
    let (_alice_dir, alice) = init_repo("alice");
    let nowhere = tempfile::TempDir::new().unwrap();
    let err = alice
        .fetch(nowhere.path(), false, &mut AssumeYes)
        .unwrap_err();
    assert!(matches!(err, VcsError::FetchSourceNotFound(_)));
}

#[test]
fn test_fetch_into_itself() {
    let (alice_dir, alice) = init_repo("alice");
    let err = alice
        .fetch(alice_dir.path(), false, &mut AssumeYes)
        .unwrap_err();
    assert!(matches!(err, VcsError::SameRepository(_)));
}

#[test]
fn test_commit_after_fetch_uses_fresh_sequence() {
    let (bob_dir, bob) = init_repo("bob");
    write_file(bob_dir.path(), "b.txt", "bob");
    bob.commit(&IgnoreSet::new()).unwrap();

    let (alice_dir, alice) = init_repo("alice");
    alice.fetch(bob.root(), false, &mut AssumeYes).unwrap();
    write_file(alice_dir.path(), "a.txt", "alice");
    let committed = alice.commit(&IgnoreSet::new()).unwrap();

    // the pointer never moved, but sequence 1 already belongs to bob
    assert_eq!(committed.previous, "V00000_alice");
    assert_eq!(committed.tag, CommitTag::new(2, "alice"));
    assert_eq!(
        alice.commits().unwrap(),
        vec![CommitTag::new(1, "bob"), CommitTag::new(2, "alice")]
    );

    // both directions stay fetchable
    let back = bob.fetch(alice.root(), false, &mut AssumeYes).unwrap();
    assert_eq!(back.plan.incoming, vec![CommitTag::new(2, "alice")]);
    assert_eq!(back.plan.skipped, vec![CommitTag::new(1, "bob")]);

    let (_carol_dir, carol) = init_repo("carol");
    let result = carol.fetch(alice.root(), false, &mut AssumeYes).unwrap();
    assert_eq!(result.plan.incoming.len(), 2);
}
