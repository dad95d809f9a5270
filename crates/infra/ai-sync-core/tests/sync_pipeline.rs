//! End-to-end pipeline tests with in-process clone transports.

mod support;

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use ai_sync_core::{
    CancellationToken, ClassificationPolicy, NoProgress, ProgressSink, RepoCloner, Stage,
    SyncError, SyncOutcome, SyncRequest, run_sync,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Materializes a fixed tree and remembers which workspace it was handed.
struct FixtureCloner {
    files: Vec<(&'static str, &'static str)>,
    seen: RefCell<Vec<PathBuf>>,
}

impl FixtureCloner {
    fn new(files: &[(&'static str, &'static str)]) -> Self {
        Self {
            files: files.to_vec(),
            seen: RefCell::new(Vec::new()),
        }
    }

    fn workspaces(&self) -> Vec<PathBuf> {
        self.seen.borrow().clone()
    }
}

impl RepoCloner for FixtureCloner {
    fn clone_shallow(
        &self,
        _url: &str,
        destination: &Path,
        _cancel: &CancellationToken,
    ) -> ai_sync_core::Result<()> {
        self.seen
            .borrow_mut()
            .push(destination.parent().unwrap().to_path_buf());
        std::fs::create_dir_all(destination.join(".git")).unwrap();
        std::fs::write(destination.join(".git/HEAD"), "ref: refs/heads/main").unwrap();
        support::write_tree(destination, &self.files);
        Ok(())
    }
}

/// Leaves a partial checkout behind and then fails.
struct FailingCloner {
    seen: RefCell<Option<PathBuf>>,
}

impl RepoCloner for FailingCloner {
    fn clone_shallow(
        &self,
        url: &str,
        destination: &Path,
        _cancel: &CancellationToken,
    ) -> ai_sync_core::Result<()> {
        *self.seen.borrow_mut() = Some(destination.parent().unwrap().to_path_buf());
        support::write_tree(destination, &[("copilot/half.md", "partial")]);
        Err(SyncError::Transport {
            url: url.to_string(),
            message: "connection reset".into(),
        })
    }
}

/// Cancels the token as soon as `after` files have been copied.
struct CancelAfter<'a> {
    after: usize,
    cancel: &'a CancellationToken,
    stages: RefCell<Vec<Stage>>,
}

impl ProgressSink for CancelAfter<'_> {
    fn report(&self, stage: Stage) {
        self.stages.borrow_mut().push(stage);
        if let Stage::Copied { done, .. } = stage
            && done >= self.after
        {
            self.cancel.cancel();
        }
    }
}

const E2E_TREE: &[(&str, &str)] = &[
    (".github/copilot/agents/a.md", "# agent"),
    ("src/index.ts", "export {}"),
    ("copilot.yml", "enabled: true"),
];

fn request(target: &Path, workspace_parent: &Path) -> SyncRequest {
    SyncRequest {
        repo_url: "https://github.com/org/configs.git".into(),
        target: target.to_path_buf(),
        policy: ClassificationPolicy::Strict,
        workspace_parent: Some(workspace_parent.to_path_buf()),
        dry_run: false,
    }
}

#[test]
fn copies_qualifying_files_and_removes_workspace() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out");
    let scratch = temp.path().join("scratch");
    let cloner = FixtureCloner::new(E2E_TREE);

    let outcome = run_sync(
        &request(&target, &scratch),
        &cloner,
        &NoProgress,
        &CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(
        outcome,
        SyncOutcome::Copied {
            count: 2,
            target: target.clone()
        }
    );
    assert_eq!(
        support::list_files(&target),
        vec![".github/copilot/agents/a.md", "copilot.yml"]
    );
    assert_eq!(
        std::fs::read_to_string(target.join("copilot.yml")).unwrap(),
        "enabled: true"
    );

    let workspaces = cloner.workspaces();
    assert_eq!(workspaces.len(), 1);
    assert!(!workspaces[0].exists());
    assert_eq!(std::fs::read_dir(&scratch).unwrap().count(), 0);
}

#[test]
fn empty_harvest_is_nothing_found() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out");
    let cloner = FixtureCloner::new(&[("README.md", "hi"), ("src/main.rs", "fn main() {}")]);

    let outcome = run_sync(
        &request(&target, temp.path()),
        &cloner,
        &NoProgress,
        &CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(outcome, SyncOutcome::NothingFound);
    assert!(!target.exists());
    assert!(!cloner.workspaces()[0].exists());
}

#[test]
fn git_metadata_is_never_copied() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out");
    let cloner = FixtureCloner::new(&[(".git/copilot/config", "x"), ("copilot/ok.md", "ok")]);

    run_sync(
        &request(&target, temp.path()),
        &cloner,
        &NoProgress,
        &CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(support::list_files(&target), vec!["copilot/ok.md"]);
}

#[test]
fn permissive_policy_matches_more() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out");
    let cloner = FixtureCloner::new(&[("docs/mycopilotnotes.txt", "x"), ("copilot.yml", "x")]);
    let mut req = request(&target, temp.path());
    req.policy = ClassificationPolicy::Permissive;

    let outcome = run_sync(&req, &cloner, &NoProgress, &CancellationToken::new()).unwrap();

    assert!(matches!(outcome, SyncOutcome::Copied { count: 2, .. }));
}

#[test]
fn transport_failure_still_removes_workspace() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out");
    let cloner = FailingCloner {
        seen: RefCell::new(None),
    };

    let err = run_sync(
        &request(&target, temp.path()),
        &cloner,
        &NoProgress,
        &CancellationToken::new(),
    )
    .unwrap_err();

    assert!(matches!(err, SyncError::Transport { .. }), "{err}");
    assert!(err.to_string().contains("connection reset"));
    let workspace = cloner.seen.borrow().clone().unwrap();
    assert!(!workspace.exists());
    assert!(!target.exists());
}

#[test]
fn cancellation_during_clone_copies_nothing() {
    struct CancellingCloner<'a>(&'a CancellationToken, Cell<Option<PathBuf>>);

    impl RepoCloner for CancellingCloner<'_> {
        fn clone_shallow(
            &self,
            _url: &str,
            destination: &Path,
            _cancel: &CancellationToken,
        ) -> ai_sync_core::Result<()> {
            self.1.set(destination.parent().map(Path::to_path_buf));
            support::write_tree(destination, E2E_TREE);
            self.0.cancel();
            Ok(())
        }
    }

    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out");
    let cancel = CancellationToken::new();
    let cloner = CancellingCloner(&cancel, Cell::new(None));

    let outcome = run_sync(&request(&target, temp.path()), &cloner, &NoProgress, &cancel).unwrap();

    assert_eq!(outcome, SyncOutcome::Cancelled { copied: 0 });
    assert!(support::list_files(&target).is_empty());
    assert!(!cloner.1.take().unwrap().exists());
}

#[test]
fn cancellation_mid_copy_keeps_exactly_n_files() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out");
    let cloner = FixtureCloner::new(&[
        ("copilot/a.md", "a"),
        ("copilot/b.md", "b"),
        ("copilot/c.md", "c"),
        ("copilot/d.md", "d"),
    ]);
    let cancel = CancellationToken::new();
    let sink = CancelAfter {
        after: 2,
        cancel: &cancel,
        stages: RefCell::new(Vec::new()),
    };

    let outcome = run_sync(&request(&target, temp.path()), &cloner, &sink, &cancel).unwrap();

    assert_eq!(outcome, SyncOutcome::Cancelled { copied: 2 });
    assert_eq!(
        support::list_files(&target),
        vec!["copilot/a.md", "copilot/b.md"]
    );
    assert!(!cloner.workspaces()[0].exists());

    let stages = sink.stages.borrow();
    assert_eq!(
        stages[..4],
        [
            Stage::Cloning,
            Stage::Downloading,
            Stage::Harvesting,
            Stage::Copying { total: 4 }
        ]
    );
}

#[test]
fn existing_target_files_are_overwritten_and_others_kept() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out");
    support::write_tree(&target, &[("copilot.yml", "old"), ("mine.txt", "keep")]);
    let cloner = FixtureCloner::new(E2E_TREE);

    run_sync(
        &request(&target, temp.path()),
        &cloner,
        &NoProgress,
        &CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(
        std::fs::read_to_string(target.join("copilot.yml")).unwrap(),
        "enabled: true"
    );
    assert_eq!(
        std::fs::read_to_string(target.join("mine.txt")).unwrap(),
        "keep"
    );
}
