//! Round trip, dedup stability, and revert exactness over generated trees

use proptest::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use vcontrol::ignore::IgnoreSet;
use vcontrol::{AssumeYes, Repository};
use walkdir::WalkDir;

type Tree = BTreeMap<String, String>;

/// Paths whose directory names and file names never overlap, so no path is
/// both a file and a directory.
fn path_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(prop::sample::select(vec!["d0", "d1", "d2"]), 0..3),
        prop::sample::select(vec!["f0.txt", "f1.txt", "f2.txt", "f3.txt"]),
    )
        .prop_map(|(dirs, file)| {
            let mut parts: Vec<&str> = dirs;
            parts.push(file);
            parts.join("/")
        })
}

fn tree_strategy() -> impl Strategy<Value = Tree> {
    prop::collection::btree_map(path_strategy(), "[a-z0-9 ]{0,24}", 1..10)
}

/// Replace the working tree (control directory excluded) with `tree`.
fn materialize(root: &Path, tree: &Tree) {
    for entry in fs::read_dir(root).unwrap() {
        let entry = entry.unwrap();
        if entry.file_name() == ".vcs" {
            continue;
        }
        if entry.file_type().unwrap().is_dir() {
            fs::remove_dir_all(entry.path()).unwrap();
        } else {
            fs::remove_file(entry.path()).unwrap();
        }
    }
    for (key, contents) in tree {
        let path = root.join(key);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
}

fn read_tree(root: &Path) -> Tree {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".vcs")
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let key = e
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            (key, fs::read_to_string(e.path()).unwrap())
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_commit_then_revert_reproduces_tree(tree in tree_strategy(), noise in tree_strategy()) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let repo = Repository::create(root, "prop", "alice").unwrap();

        materialize(root, &tree);
        let result = repo.commit(&IgnoreSet::new()).unwrap();

        materialize(root, &noise);
        repo.revert(&result.tag, &mut AssumeYes).unwrap();
        prop_assert_eq!(read_tree(root), tree);
    }

    #[test]
    fn prop_unchanged_files_keep_their_location(tree in tree_strategy(), extra_commits in 1usize..4) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let repo = Repository::create(root, "prop", "alice").unwrap();

        materialize(root, &tree);
        let first = repo.commit(&IgnoreSet::new()).unwrap();

        for i in 0..extra_commits {
            // a file outside the generated namespace, so generated paths stay untouched
            fs::write(root.join(format!("extra{}.log", i)), i.to_string()).unwrap();
            let next = repo.commit(&IgnoreSet::new()).unwrap();
            prop_assert_eq!(next.changes.changed_or_added_count(), 1);
            let first_tag = first.tag.to_string();
            for key in tree.keys() {
                prop_assert_eq!(
                    next.manifest.get(key).map(|r| r.subdir.as_str()),
                    Some(first_tag.as_str())
                );
            }
        }
    }

    #[test]
    fn prop_revert_matches_any_commit(trees in prop::collection::vec(tree_strategy(), 2..5), pick in any::<prop::sample::Index>()) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let repo = Repository::create(root, "prop", "alice").unwrap();

        let mut history = Vec::new();
        for tree in &trees {
            materialize(root, tree);
            match repo.commit(&IgnoreSet::new()) {
                Ok(result) => history.push((result.tag, tree.clone())),
                // identical consecutive trees produce no commit
                Err(vcontrol::VcsError::NothingToCommit) => {}
                Err(e) => return Err(TestCaseError::fail(e.to_string())),
            }
        }

        let (tag, expected) = pick.get(&history);
        repo.revert(tag, &mut AssumeYes).unwrap();
        prop_assert_eq!(&read_tree(root), expected);

        let manifest = repo.manifest(tag).unwrap();
        let keys: Vec<_> = manifest.paths().cloned().collect();
        let expected_keys: Vec<_> = expected.keys().cloned().collect();
        prop_assert_eq!(keys, expected_keys);
    }
}
