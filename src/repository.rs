//! Repository facade: one entry point per user-facing operation.
//!
//! Repository state is loaded at the start of each operation and saved at the
//! end; nothing is cached between calls.

use crate::diff::{ChangeSet, DiffEngine};
use crate::error::VcsError;
use crate::fetch::{FetchPlan, Fetcher};
use crate::ignore::IgnoreSet;
use crate::revert::{RestoredFile, Reverter};
use crate::snapshot::{CommitStage, SnapshotWriter};
use crate::store::{
    validate_name, CommitManifest, CommitTag, ControlDir, FetchMarker, FileRecord,
    RepositoryState,
};
use crate::tree::walker::{Walker, WalkerConfig};
use chrono::{SecondsFormat, Utc};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Decides whether a destructive step may proceed.
pub trait Confirmation {
    fn confirm(&mut self, prompt: &str) -> Result<bool, VcsError>;
}

impl<F> Confirmation for F
where
    F: FnMut(&str) -> Result<bool, VcsError>,
{
    fn confirm(&mut self, prompt: &str) -> Result<bool, VcsError> {
        self(prompt)
    }
}

/// Confirms everything without asking.
pub struct AssumeYes;

impl Confirmation for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> Result<bool, VcsError> {
        Ok(true)
    }
}

/// Snapshot of the repository for `info`.
#[derive(Debug, Clone)]
pub struct RepositoryInfo {
    pub repo_name: String,
    pub user: String,
    pub head: String,
    pub last_fetch: Option<String>,
    pub commit_count: usize,
    pub changes: ChangeSet,
    pub tracked: Vec<(String, FileRecord)>,
}

#[derive(Debug, Clone)]
pub struct CommitResult {
    /// Label of the commit the pointer was on before (`V00000_<user>` when none).
    pub previous: String,
    pub tag: CommitTag,
    pub changes: ChangeSet,
    pub manifest: CommitManifest,
}

#[derive(Debug, Clone)]
pub struct RevertResult {
    pub tag: CommitTag,
    pub restored: Vec<RestoredFile>,
}

#[derive(Debug, Clone)]
pub struct FetchResult {
    pub plan: FetchPlan,
    pub reverted: Option<RevertResult>,
}

/// A workspace with an initialized control directory.
pub struct Repository {
    root: PathBuf,
    control: ControlDir,
}

impl Repository {
    /// Initialize a repository in `root`.
    pub fn create(root: &Path, repo_name: &str, user: &str) -> Result<Self, VcsError> {
        validate_name("repository name", repo_name)?;
        validate_name("username", user)?;
        let control = ControlDir::for_workspace(root);
        control.initialize(&RepositoryState::new(repo_name, user))?;
        info!(repo = repo_name, user, root = %root.display(), "Created repository");
        Ok(Self {
            root: root.to_path_buf(),
            control,
        })
    }

    /// Open the repository rooted at `root`.
    pub fn open(root: &Path) -> Result<Self, VcsError> {
        let control = ControlDir::for_workspace(root);
        if !control.is_initialized() {
            return Err(VcsError::NotInitialized(root.to_path_buf()));
        }
        Ok(Self {
            root: root.to_path_buf(),
            control,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn control(&self) -> &ControlDir {
        &self.control
    }

    pub fn state(&self) -> Result<RepositoryState, VcsError> {
        self.control.load_state()
    }

    /// Complete commits in the local store, in tag order.
    pub fn commits(&self) -> Result<Vec<CommitTag>, VcsError> {
        self.control.list_commits()
    }

    pub fn manifest(&self, tag: &CommitTag) -> Result<CommitManifest, VcsError> {
        self.control.load_manifest(tag)
    }

    /// Working-tree paths, excluding the control directory and `ignore`.
    pub fn scan(&self, ignore: &IgnoreSet) -> Result<BTreeSet<String>, VcsError> {
        let config = WalkerConfig::with_ignore(ignore.clone());
        Ok(Walker::with_config(self.root.clone(), config).walk()?)
    }

    /// Changes in the working tree since the last commit.
    pub fn status(&self, ignore: &IgnoreSet) -> Result<ChangeSet, VcsError> {
        let state = self.control.load_state()?;
        let working = self.scan(ignore)?;
        let previous = self.head_manifest(&state)?;
        DiffEngine::new(&self.root, &self.control).classify(&working, previous.as_ref())
    }

    pub fn info(&self, ignore: &IgnoreSet) -> Result<RepositoryInfo, VcsError> {
        let state = self.control.load_state()?;
        let working = self.scan(ignore)?;
        let previous = self.head_manifest(&state)?;
        let changes =
            DiffEngine::new(&self.root, &self.control).classify(&working, previous.as_ref())?;
        let tracked = previous
            .map(|m| m.commits.into_iter().collect())
            .unwrap_or_default();
        Ok(RepositoryInfo {
            head: state.head_label(),
            repo_name: state.repo_name,
            user: state.user,
            last_fetch: state.last_fetch,
            commit_count: self.control.list_commits()?.len(),
            changes,
            tracked,
        })
    }

    /// Snapshot the working tree as the next commit.
    ///
    /// The pointer only advances after the new manifest is on disk.
    pub fn commit(&self, ignore: &IgnoreSet) -> Result<CommitResult, VcsError> {
        let mut state = self.control.load_state()?;
        let working = self.scan(ignore)?;
        if working.is_empty() {
            return Err(VcsError::EmptyWorkingTree);
        }
        debug!(stage = ?CommitStage::Scanned, files = working.len(), "Commit scan complete");

        let previous = self.head_manifest(&state)?;
        let changes =
            DiffEngine::new(&self.root, &self.control).classify(&working, previous.as_ref())?;
        debug!(stage = ?CommitStage::Classified, "Commit classification complete");
        if changes.is_empty() {
            return Err(VcsError::NothingToCommit);
        }

        let previous_label = state.head_label();
        let highest_stored = self
            .control
            .list_commits()?
            .iter()
            .map(CommitTag::sequence)
            .max()
            .unwrap_or(0);
        let tag = state.next_tag(highest_stored);
        let previous = previous.unwrap_or_default();
        let marker = FetchMarker::from_last_fetch(state.last_fetch.as_deref());
        let manifest =
            SnapshotWriter::new(&self.root, &self.control).write(&previous, &changes, &tag, marker)?;

        state.advance_to(&tag)?;
        self.control.save_state(&state)?;
        info!(
            tag = %tag,
            stage = ?CommitStage::PointerAdvanced,
            added = changes.added.len(),
            changed = changes.changed.len(),
            deleted = changes.deleted.len(),
            "Committed"
        );

        Ok(CommitResult {
            previous: previous_label,
            tag,
            changes,
            manifest,
        })
    }

    /// Replace the working tree with commit `tag`'s file set.
    ///
    /// The repository pointer does not move.
    pub fn revert(
        &self,
        tag: &CommitTag,
        confirm: &mut dyn Confirmation,
    ) -> Result<RevertResult, VcsError> {
        self.control.load_state()?;
        let manifest = self.control.load_manifest(tag)?;
        let prompt = format!(
            "Revert to commit {}? You will lose uncommitted changes in your working directory.",
            tag
        );
        if !confirm.confirm(&prompt)? {
            return Err(VcsError::Cancelled("Canceling revert.".to_string()));
        }

        let restored = Reverter::new(&self.root, &self.control).revert(&manifest)?;
        info!(tag = %tag, files = restored.len(), "Reverted working tree");
        Ok(RevertResult {
            tag: tag.clone(),
            restored,
        })
    }

    /// Import commits from the repository at `source` (a workspace or a control directory).
    ///
    /// With `revert_latest`, confirmation is requested before anything is copied;
    /// after the copy the working tree is reverted to the foreign repository's last
    /// commit and the local pointer moves to it.
    pub fn fetch(
        &self,
        source: &Path,
        revert_latest: bool,
        confirm: &mut dyn Confirmation,
    ) -> Result<FetchResult, VcsError> {
        let mut state = self.control.load_state()?;
        let foreign = ControlDir::locate(source)
            .ok_or_else(|| VcsError::FetchSourceNotFound(source.to_path_buf()))?;
        let fetcher = Fetcher::new(&self.control);
        let plan = fetcher.plan(&foreign)?;

        let revert_target = match (&plan.foreign_head, revert_latest) {
            (Some(head), true) => {
                // reject before copying if the pointer would move backwards
                state.clone().advance_to(head)?;
                let prompt = format!(
                    "Revert to fetched commit {}? You will lose uncommitted changes in your working directory.",
                    head
                );
                if !confirm.confirm(&prompt)? {
                    return Err(VcsError::Cancelled("Canceling fetch.".to_string()));
                }
                Some(head.clone())
            }
            (None, true) => {
                warn!(source = %plan.source.display(), "Fetched repository has no commits to revert to");
                None
            }
            (_, false) => None,
        };

        fetcher.apply(&foreign, &plan)?;
        state.last_fetch = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));

        let reverted = match revert_target {
            Some(head) => {
                let manifest = self.control.load_manifest(&head)?;
                let restored = Reverter::new(&self.root, &self.control).revert(&manifest)?;
                state.advance_to(&head)?;
                Some(RevertResult {
                    tag: head,
                    restored,
                })
            }
            None => None,
        };

        self.control.save_state(&state)?;
        info!(
            source = %plan.source.display(),
            imported = plan.incoming.len(),
            skipped = plan.skipped.len(),
            reverted = reverted.is_some(),
            "Fetch complete"
        );
        Ok(FetchResult { plan, reverted })
    }

    fn head_manifest(&self, state: &RepositoryState) -> Result<Option<CommitManifest>, VcsError> {
        state
            .head()
            .map(|tag| self.control.load_manifest(&tag))
            .transpose()
    }
}
