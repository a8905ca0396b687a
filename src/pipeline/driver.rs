//! Build pipeline driver.
//!
//! Runs one build through `Bootstrapping → Preparing → Walking → Draining →
//! Done`. The tree walker forwards every leaf file over a channel; the driver
//! schedules a transform + write task per file (bounded by a semaphore) and a
//! single aggregating loop records completions, appends index lines and turns
//! the first write failure into a fatal [`BuildError::WriteFailed`].
//!
//! Termination does not depend on the Work Counter reaching zero: the build is
//! drained once the walk has finished and every scheduled write has been
//! joined. The counter total only drives the progress line, so a top-level
//! count that under-predicts nested files cannot stall the pipeline.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::error::BuildError;
use crate::files::{self, FileHandle};
use crate::transform;
use crate::vcs::{self, CommandRunner};

use super::config::{BuildConfig, CountPolicy};
use super::index::IndexBlob;
use super::progress::ProgressReporter;
use super::WorkCounter;

/// Build lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Bootstrapping,
    Preparing,
    Walking,
    Draining,
    Done,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Bootstrapping => "bootstrapping",
            PipelineState::Preparing => "preparing",
            PipelineState::Walking => "walking",
            PipelineState::Draining => "draining",
            PipelineState::Done => "done",
        };
        f.write_str(name)
    }
}

/// Summary of a finished build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Whether the source had to be fetched first.
    pub bootstrapped: bool,
    /// Work Counter total the progress line was sized with.
    pub expected: usize,
    /// Leaf files visited by the walk.
    pub visited: usize,
    /// Components written.
    pub written: usize,
    pub index_path: Option<PathBuf>,
    pub index_entries: usize,
    pub elapsed_ms: u64,
    pub finished_at: DateTime<Utc>,
}

/// A component that reached disk.
#[derive(Debug)]
struct WrittenComponent {
    name: String,
    file_name: String,
}

/// Drives a single build.
pub struct PipelineDriver {
    config: BuildConfig,
    runner: Arc<dyn CommandRunner>,
    state: PipelineState,
}

impl PipelineDriver {
    pub fn new(config: BuildConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            config,
            runner,
            state: PipelineState::Bootstrapping,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn transition(&mut self, next: PipelineState) {
        debug!(from = %self.state, to = %next, "Pipeline transition");
        self.state = next;
    }

    /// Runs the build to completion.
    ///
    /// # Errors
    ///
    /// Any error is fatal for the build; in-flight writes are aborted and no
    /// partial output is cleaned up.
    pub async fn run(&mut self) -> Result<BuildReport, BuildError> {
        self.config.validate()?;
        let started = Instant::now();
        info!(source = %self.config.source_dir.display(), "Starting build");

        self.state = PipelineState::Bootstrapping;
        let bootstrapped = self.ensure_source().await?;

        self.transition(PipelineState::Preparing);
        let output_dir = self.config.output_dir.clone();
        FileHandle::create_dir(&output_dir)
            .await
            .map_err(|source| BuildError::CreateOutput {
                path: output_dir.clone(),
                source,
            })?;

        self.transition(PipelineState::Walking);
        let counter = WorkCounter::new(self.work_total().await?);
        let reporter = ProgressReporter::start(
            counter.clone(),
            self.config.tick_interval,
            self.config.verbose,
        );

        let drained = self.drain(&counter).await;
        reporter.stop().await;
        let (visited, index) = drained?;

        let (remaining, overflow) = (counter.remaining(), counter.overflow());
        if remaining > 0 || overflow > 0 {
            warn!(
                expected = counter.total(),
                written = counter.completed(),
                remaining,
                overflow,
                "Work counter total did not match the files written"
            );
        }

        let index_path = self.config.index_path();
        if let Some(path) = &index_path {
            index
                .persist(path)
                .await
                .map_err(|source| BuildError::IndexWrite {
                    path: path.clone(),
                    source,
                })?;
            info!(path = %path.display(), entries = index.len(), "Wrote index");
        }

        self.transition(PipelineState::Done);
        let report = BuildReport {
            source_dir: self.config.source_dir.clone(),
            output_dir,
            bootstrapped,
            expected: counter.total(),
            visited,
            written: counter.completed(),
            index_entries: if index_path.is_some() { index.len() } else { 0 },
            index_path,
            elapsed_ms: started.elapsed().as_millis() as u64,
            finished_at: Utc::now(),
        };
        info!(
            written = report.written,
            elapsed_ms = report.elapsed_ms,
            "Build successful"
        );
        Ok(report)
    }

    /// Fetches the icon source through the bootstrap command when it is
    /// absent. Returns whether the command ran.
    async fn ensure_source(&self) -> Result<bool, BuildError> {
        let source = &self.config.source_dir;
        if FileHandle::exists(source).await {
            return Ok(false);
        }

        info!(source = %source.display(), "Source not found, initializing submodules");
        vcs::bootstrap(self.runner.as_ref(), &self.config.root)
            .await
            .map_err(BuildError::Bootstrap)?;

        if !FileHandle::exists(source).await {
            return Err(BuildError::SourceMissing(source.clone()));
        }
        Ok(true)
    }

    async fn work_total(&self) -> Result<usize, BuildError> {
        let source = self.config.source_dir.clone();
        match self.config.count_policy {
            CountPolicy::TopLevel => {
                let count = FileHandle::count(&source).await;
                count.map_err(|err| BuildError::Count {
                    path: source,
                    source: err,
                })
            }
            CountPolicy::Recursive => {
                let total =
                    tokio::task::spawn_blocking(move || files::count_leaf_files(&source)).await??;
                Ok(total)
            }
        }
    }

    /// Walks the source, writes every component and aggregates the results.
    async fn drain(&mut self, counter: &WorkCounter) -> Result<(usize, IndexBlob), BuildError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<FileHandle>();
        let walker = tokio::spawn(files::walk(self.config.source_dir.clone(), move |file| {
            // The receiver outlives the walk unless the build already failed.
            let _ = tx.send(file);
        }));

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_writes));
        let mut writes: JoinSet<Result<WrittenComponent, BuildError>> = JoinSet::new();
        let mut index = IndexBlob::new(self.config.extension.clone());
        let mut walk_done = false;

        let result = loop {
            if walk_done && writes.is_empty() {
                break Ok(());
            }

            tokio::select! {
                received = rx.recv(), if !walk_done => match received {
                    Some(file) => {
                        let semaphore = semaphore.clone();
                        let out_dir = self.config.output_dir.clone();
                        let extension = self.config.extension.clone();
                        writes.spawn(async move {
                            // The semaphore is never closed.
                            let _permit = semaphore.acquire_owned().await.ok();
                            write_component(file, &out_dir, &extension).await
                        });
                    }
                    None => {
                        walk_done = true;
                        self.transition(PipelineState::Draining);
                    }
                },
                Some(joined) = writes.join_next(), if !writes.is_empty() => {
                    let written = match joined {
                        Ok(Ok(written)) => written,
                        Ok(Err(err)) => break Err(err),
                        Err(err) => break Err(BuildError::TaskJoin(err)),
                    };
                    let done = counter.record_completion();
                    if self.config.verbose {
                        println!("Built {}", written.file_name);
                    }
                    debug!(file = %written.file_name, done, total = counter.total(), "Built component");
                    index.push(&written.name);
                }
            }
        };

        if let Err(err) = result {
            walker.abort();
            writes.abort_all();
            return Err(err);
        }

        let visited = walker.await??;
        Ok((visited, index))
    }
}

/// Transforms `file` into a component under `out_dir` and writes it.
async fn write_component(
    mut file: FileHandle,
    out_dir: &Path,
    extension: &str,
) -> Result<WrittenComponent, BuildError> {
    transform::apply(&mut file, out_dir, extension);
    file.write()
        .await
        .map_err(|source| BuildError::WriteFailed {
            file: file.name(true),
            source,
        })?;

    Ok(WrittenComponent {
        name: file.name(false),
        file_name: file.name(true),
    })
}
