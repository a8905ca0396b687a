//! Error types for iconforge operations.
//!
//! Defines error types for each subsystem:
//! - Source tree traversal
//! - The build pipeline (bootstrap, output preparation, writes, index)
//! - External command execution (git)
//! - Release packaging

use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::ConfigError;

/// Errors raised while walking the source tree.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("Failed to list directory '{}': {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to stat '{}': {source}", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by an external command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' exited with code {code:?}: {stderr}")]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Command '{command}' produced non UTF-8 output")]
    InvalidOutput { command: String },
}

/// Errors that terminate a build.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to initialize icon source: {0}")]
    Bootstrap(#[source] CommandError),

    #[error("Source directory not found: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("Failed to create output directory '{}': {source}", .path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to count entries in '{}': {source}", .path.display())]
    Count {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Walk(#[from] WalkError),

    #[error("Failed to write {file}:\n{source}")]
    WriteFailed {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write index '{}': {source}", .path.display())]
    IndexWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Write task aborted: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Errors raised while packaging the build output.
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("Failed to copy {file}: {source}")]
    Copy {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create output directory '{}': {source}", .path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid package manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
