//! End-to-end tests for the icon build pipeline.
//!
//! Each test builds a throwaway project tree under a temp directory and runs
//! the real driver against it. Git is replaced by a recording runner.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use iconforge::pipeline::{BuildConfig, CountPolicy, PipelineDriver, PipelineState};
use iconforge::vcs::{CommandRunner, CommandSpec};
use iconforge::{BuildError, CommandError};
use tempfile::TempDir;

const ICON: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    "\n",
    r#"<svg xmlns="http://www.w3.org/2000/svg" id="mdi-icon" viewBox="0 0 24 24"><path d="M12,2L2,22H22Z" /></svg>"#,
);

type Hook = Box<dyn Fn(&CommandSpec) -> Result<(), CommandError> + Send + Sync>;

/// Records every command; optionally runs a hook that plays the command's part.
#[derive(Default)]
struct RecordingRunner {
    calls: Mutex<Vec<String>>,
    hook: Option<Hook>,
}

impl RecordingRunner {
    fn with_hook(hook: Hook) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            hook: Some(hook),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &CommandSpec) -> Result<(), CommandError> {
        self.calls.lock().unwrap().push(command.to_string());
        match &self.hook {
            Some(hook) => hook(command),
            None => Ok(()),
        }
    }

    async fn capture(&self, command: &CommandSpec) -> Result<String, CommandError> {
        self.run(command).await.map(|_| String::new())
    }
}

fn new_project() -> (TempDir, BuildConfig) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = BuildConfig::for_root(temp_dir.path()).with_tick_interval(Duration::from_millis(5));
    (temp_dir, config)
}

fn write_icons(dir: &Path, names: &[&str]) {
    std::fs::create_dir_all(dir).unwrap();
    for name in names {
        std::fs::write(dir.join(name), ICON).unwrap();
    }
}

fn output_names(dir: &Path) -> BTreeSet<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

fn index_symbols(index: &str) -> BTreeSet<String> {
    index
        .lines()
        .map(|line| {
            let rest = line
                .strip_prefix("export { default as ")
                .unwrap_or_else(|| panic!("unexpected index line: {line}"));
            let (name, from) = rest.split_once(" } from ").unwrap();
            assert_eq!(from, format!("\"./{name}.svelte\";"));
            name.to_string()
        })
        .collect()
}

#[tokio::test]
async fn test_flat_source_writes_one_component_per_icon() {
    let (_temp_dir, config) = new_project();
    let config = config.with_index_file("index.js");
    let icons = ["account.svg", "account-alert.svg", "alarm-light-outline.svg"];
    write_icons(&config.source_dir, &icons);

    let runner = Arc::new(RecordingRunner::default());
    let mut driver = PipelineDriver::new(config.clone(), runner.clone());
    let report = driver.run().await.expect("build should succeed");

    assert_eq!(report.expected, 3);
    assert_eq!(report.visited, 3);
    assert_eq!(report.written, 3);
    assert_eq!(report.index_entries, 3);
    assert!(runner.calls().is_empty());

    let outputs = output_names(&config.output_dir);
    let expected: BTreeSet<String> = [
        "Account.svelte",
        "AccountAlert.svelte",
        "AlarmLightOutline.svelte",
        "index.js",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert_eq!(outputs, expected);

    let index = std::fs::read_to_string(config.output_dir.join("index.js")).unwrap();
    assert_eq!(index.lines().count(), 3);
    let symbols = index_symbols(&index);
    let components: BTreeSet<String> = outputs
        .iter()
        .filter_map(|name| name.strip_suffix(".svelte"))
        .map(String::from)
        .collect();
    assert_eq!(symbols, components);

    let component = std::fs::read_to_string(config.output_dir.join("AccountAlert.svelte")).unwrap();
    assert_eq!(
        component,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" {...$$props} ><path d="M12,2L2,22H22Z" /></svg>"#
    );
}

#[tokio::test]
async fn test_build_without_index_writes_only_components() {
    let (_temp_dir, config) = new_project();
    write_icons(&config.source_dir, &["home.svg", "home-outline.svg"]);

    let mut driver = PipelineDriver::new(config.clone(), Arc::new(RecordingRunner::default()));
    let report = driver.run().await.expect("build should succeed");

    assert_eq!(report.index_path, None);
    assert_eq!(report.index_entries, 0);
    assert_eq!(
        output_names(&config.output_dir),
        BTreeSet::from(["Home.svelte".to_string(), "HomeOutline.svelte".to_string()])
    );
}

#[tokio::test]
async fn test_empty_source_produces_empty_index() {
    let (_temp_dir, config) = new_project();
    let config = config.with_index_file("index.js");
    std::fs::create_dir_all(&config.source_dir).unwrap();

    let mut driver = PipelineDriver::new(config.clone(), Arc::new(RecordingRunner::default()));
    let report = driver.run().await.expect("build should succeed");

    assert_eq!(report.written, 0);
    assert_eq!(
        std::fs::read_to_string(config.output_dir.join("index.js")).unwrap(),
        ""
    );
}

#[tokio::test]
async fn test_nested_source_terminates_despite_top_level_undercount() {
    let (_temp_dir, config) = new_project();
    let config = config.with_index_file("index.js");
    write_icons(&config.source_dir, &["alpha.svg"]);
    write_icons(
        &config.source_dir.join("extra"),
        &["beta.svg", "gamma.svg", "delta.svg"],
    );

    let mut driver = PipelineDriver::new(config.clone(), Arc::new(RecordingRunner::default()));
    let report = tokio::time::timeout(Duration::from_secs(10), driver.run())
        .await
        .expect("build must not stall")
        .expect("build should succeed");

    // Two top-level entries, one of them a directory holding three icons.
    assert_eq!(report.expected, 2);
    assert_eq!(report.visited, 4);
    assert_eq!(report.written, 4);
    assert_eq!(report.index_entries, 4);
    assert_eq!(driver.state(), PipelineState::Done);

    let outputs = output_names(&config.output_dir);
    for name in ["Alpha.svelte", "Beta.svelte", "Gamma.svelte", "Delta.svelte"] {
        assert!(outputs.contains(name), "missing {name}");
    }
}

#[tokio::test]
async fn test_nested_source_with_recursive_count() {
    let (_temp_dir, config) = new_project();
    let config = config.with_count_policy(CountPolicy::Recursive);
    write_icons(&config.source_dir, &["alpha.svg"]);
    write_icons(
        &config.source_dir.join("extra"),
        &["beta.svg", "gamma.svg", "delta.svg"],
    );

    let mut driver = PipelineDriver::new(config, Arc::new(RecordingRunner::default()));
    let report = driver.run().await.expect("build should succeed");

    assert_eq!(report.expected, 4);
    assert_eq!(report.written, 4);
}

#[tokio::test]
async fn test_missing_source_runs_bootstrap_exactly_once() {
    let (_temp_dir, config) = new_project();
    let source_dir = config.source_dir.clone();
    let runner = Arc::new(RecordingRunner::with_hook(Box::new(move |_: &CommandSpec| {
        write_icons(&source_dir, &["cloud.svg", "cloud-upload.svg"]);
        Ok(())
    })));

    let mut driver = PipelineDriver::new(config.clone(), runner.clone());
    let report = driver.run().await.expect("build should succeed");

    assert!(report.bootstrapped);
    assert_eq!(report.written, 2);
    assert_eq!(
        runner.calls(),
        vec!["git submodule update --init --recursive".to_string()]
    );

    // Source now exists; a second build must not bootstrap again.
    let mut driver = PipelineDriver::new(config, runner.clone());
    let report = driver.run().await.expect("second build should succeed");

    assert!(!report.bootstrapped);
    assert_eq!(runner.calls().len(), 1);
}

#[tokio::test]
async fn test_bootstrap_failure_is_fatal() {
    let (_temp_dir, config) = new_project();
    let runner = Arc::new(RecordingRunner::with_hook(Box::new(|command: &CommandSpec| {
        Err(CommandError::NonZeroExit {
            command: command.to_string(),
            code: Some(128),
            stderr: "fatal: not a git repository".to_string(),
        })
    })));

    let mut driver = PipelineDriver::new(config.clone(), runner.clone());
    let err = driver.run().await.unwrap_err();

    assert!(matches!(err, BuildError::Bootstrap(_)));
    assert_eq!(runner.calls().len(), 1);
    assert!(!config.output_dir.exists());
}

#[tokio::test]
async fn test_write_failure_is_fatal_and_names_file() {
    let (_temp_dir, config) = new_project();
    write_icons(&config.source_dir, &["bell.svg"]);
    // A directory squatting on the component path makes the write fail.
    let blocker: PathBuf = config.output_dir.join("Bell.svelte");
    std::fs::create_dir_all(&blocker).unwrap();

    let mut driver = PipelineDriver::new(config, Arc::new(RecordingRunner::default()));
    let err = driver.run().await.unwrap_err();

    match &err {
        BuildError::WriteFailed { file, .. } => assert_eq!(file, "Bell.svelte"),
        other => panic!("expected write failure, got {other:?}"),
    }
    assert!(err.to_string().contains("Failed to write Bell.svelte"));
}

#[tokio::test]
async fn test_unreadable_icon_surfaces_walk_error() {
    let (_temp_dir, config) = new_project();
    write_icons(&config.source_dir, &["ok.svg"]);
    std::fs::write(config.source_dir.join("binary.svg"), [0xff, 0xfe, 0xfd]).unwrap();

    let mut driver = PipelineDriver::new(config, Arc::new(RecordingRunner::default()));
    let err = driver.run().await.unwrap_err();

    assert!(matches!(err, BuildError::Walk(_)), "{err:?}");
}
