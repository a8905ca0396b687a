//! Icon-set submodule workflows.
//!
//! - [`bootstrap`]: initialize submodules when the icon source is missing
//! - [`SubmoduleSync`]: merge new upstream commits into the vendored submodule
//!   and record the bump in the parent repository

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::error::CommandError;
use crate::pipeline::config::SUBMODULE_DIR;

use super::{CommandRunner, CommandSpec};

/// `git submodule update --init --recursive`, run from the project root.
pub fn bootstrap_command(root: &Path) -> CommandSpec {
    CommandSpec::new("git")
        .args(["submodule", "update", "--init", "--recursive"])
        .current_dir(root)
}

/// Fetches every submodule of the project at `root`.
pub async fn bootstrap(runner: &dyn CommandRunner, root: &Path) -> Result<(), CommandError> {
    runner.run(&bootstrap_command(root)).await
}

/// Result of [`SubmoduleSync::update`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    UpToDate,
    Merged {
        commits: usize,
        before: String,
        after: String,
    },
}

/// Keeps the vendored submodule in step with its upstream branch.
pub struct SubmoduleSync {
    runner: Arc<dyn CommandRunner>,
    root: PathBuf,
    submodule: String,
    remote: String,
    branch: String,
}

impl SubmoduleSync {
    pub fn new(runner: Arc<dyn CommandRunner>, root: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            root: root.into(),
            submodule: SUBMODULE_DIR.to_string(),
            remote: "origin".to_string(),
            branch: "master".to_string(),
        }
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    fn in_submodule(&self) -> CommandSpec {
        CommandSpec::new("git").current_dir(self.root.join(&self.submodule))
    }

    fn in_root(&self) -> CommandSpec {
        CommandSpec::new("git").current_dir(&self.root)
    }

    async fn short_head(&self) -> Result<String, CommandError> {
        let out = self
            .runner
            .capture(&self.in_submodule().args(["rev-parse", "--short", "HEAD"]))
            .await?;
        Ok(out.trim().to_string())
    }

    /// Fetches the remote and, when the tracked branch has new commits, pulls
    /// them and commits the submodule bump as `auto-merged <before>..<after>`.
    pub async fn update(&self) -> Result<SyncOutcome, CommandError> {
        info!(submodule = %self.submodule, remote = %self.remote, "Fetching remote");
        self.runner.run(&self.in_submodule().arg("fetch")).await?;

        let range = format!("{branch}..{remote}/{branch}", branch = self.branch, remote = self.remote);
        let log = self
            .runner
            .capture(&self.in_submodule().args(["log", "--oneline"]).arg(range))
            .await?;

        let commits = log.lines().filter(|line| !line.trim().is_empty()).count();
        if commits == 0 {
            info!(submodule = %self.submodule, "Already up to date");
            return Ok(SyncOutcome::UpToDate);
        }
        info!(commits, "Found new upstream commits");

        let before = self.short_head().await?;
        self.runner
            .run(&self.in_submodule().arg("pull").arg(&self.remote).arg(&self.branch))
            .await?;
        let after = self.short_head().await?;

        self.runner
            .run(&self.in_root().arg("add").arg(&self.submodule))
            .await?;
        self.runner
            .run(
                &self
                    .in_root()
                    .args(["commit", "-m"])
                    .arg(format!("auto-merged {}..{}", before, after)),
            )
            .await?;

        info!(%before, %after, "Merged new commits");
        Ok(SyncOutcome::Merged {
            commits,
            before,
            after,
        })
    }
}
