//! iconforge: converts an SVG icon set into Svelte component files.
//!
//! This library provides the file-tree transformation pipeline (walk, transform,
//! write, aggregate a barrel index) together with the maintenance workflows that
//! keep the vendored icon submodule in sync and package the build output.

pub mod cli;
pub mod error;
pub mod files;
pub mod package;
pub mod pipeline;
pub mod transform;
pub mod vcs;

// Re-export commonly used error types
pub use error::{BuildError, CommandError, PackageError, WalkError};
