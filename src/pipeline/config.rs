//! Build configuration.
//!
//! This module provides configuration for the icon build pipeline: source and
//! output locations, the generated file extension, index generation, progress
//! reporting and write concurrency.

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::transform::DEFAULT_EXTENSION;

/// Directory of the vendored icon-set submodule, relative to the project root.
pub const SUBMODULE_DIR: &str = "MaterialDesign";

/// Directory holding the raw SVG files inside the submodule.
pub const SOURCE_SUBDIR: &str = "svg";

/// Default build output directory, relative to the project root.
pub const OUTPUT_DIR: &str = "build";

/// Default name of the generated barrel file.
pub const DEFAULT_INDEX_FILE: &str = "index.js";

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// How the Work Counter total is sized before the walk starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountPolicy {
    /// Immediate entries of the source directory (directories count as one).
    #[default]
    TopLevel,
    /// Every leaf file below the source directory.
    Recursive,
}

/// Configuration for a build run.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Project root; the submodule and package files live here.
    pub root: PathBuf,
    /// Directory walked for source icons.
    pub source_dir: PathBuf,
    /// Flat directory receiving generated components.
    pub output_dir: PathBuf,
    /// Extension of generated components, without the dot.
    pub extension: String,
    /// File name of the generated index inside `output_dir`; `None` disables it.
    pub index_file: Option<String>,
    /// Print one line per built file instead of the progress line.
    pub verbose: bool,
    /// Work Counter sizing.
    pub count_policy: CountPolicy,
    /// Progress reporter tick interval.
    pub tick_interval: Duration,
    /// Maximum number of component writes in flight.
    pub max_concurrent_writes: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::for_root(".")
    }
}

impl BuildConfig {
    /// Creates a configuration with the default layout under `root`.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            source_dir: root.join(SUBMODULE_DIR).join(SOURCE_SUBDIR),
            output_dir: root.join(OUTPUT_DIR),
            root,
            extension: DEFAULT_EXTENSION.to_string(),
            index_file: None,
            verbose: false,
            count_policy: CountPolicy::TopLevel,
            tick_interval: Duration::from_millis(50),
            max_concurrent_writes: 64,
        }
    }

    /// Directory of the vendored icon-set submodule.
    pub fn submodule_dir(&self) -> PathBuf {
        self.root.join(SUBMODULE_DIR)
    }

    /// Full path of the generated index, when enabled.
    pub fn index_path(&self) -> Option<PathBuf> {
        self.index_file
            .as_ref()
            .map(|name| self.output_dir.join(name))
    }

    /// Creates configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ICONFORGE_ROOT`: Project root (default: `.`); re-derives the default layout
    /// - `ICONFORGE_SOURCE_DIR`: Source icon directory (default: `<root>/MaterialDesign/svg`)
    /// - `ICONFORGE_OUTPUT_DIR`: Output directory (default: `<root>/build`)
    /// - `ICONFORGE_EXTENSION`: Generated file extension (default: `svelte`)
    /// - `ICONFORGE_INDEX_FILE`: Index file name; enables index generation
    /// - `ICONFORGE_TICK_MS`: Progress tick interval in milliseconds (default: 50)
    /// - `ICONFORGE_MAX_CONCURRENT_WRITES`: Write concurrency limit (default: 64)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable has an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`BuildConfig::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("ICONFORGE_ROOT") {
            Some(root) => Self::for_root(root),
            None => Self::default(),
        };

        if let Some(val) = lookup("ICONFORGE_SOURCE_DIR") {
            config.source_dir = PathBuf::from(val);
        }

        if let Some(val) = lookup("ICONFORGE_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(val);
        }

        if let Some(val) = lookup("ICONFORGE_EXTENSION") {
            config.extension = val;
        }

        if let Some(val) = lookup("ICONFORGE_INDEX_FILE") {
            config.index_file = Some(val);
        }

        if let Some(val) = lookup("ICONFORGE_TICK_MS") {
            let millis: u64 = parse_env_value(&val, "ICONFORGE_TICK_MS")?;
            config.tick_interval = Duration::from_millis(millis);
        }

        if let Some(val) = lookup("ICONFORGE_MAX_CONCURRENT_WRITES") {
            config.max_concurrent_writes =
                parse_env_value(&val, "ICONFORGE_MAX_CONCURRENT_WRITES")?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` if any values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_writes == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_concurrent_writes must be greater than 0".to_string(),
            ));
        }

        if self.tick_interval.is_zero() {
            return Err(ConfigError::ValidationFailed(
                "tick_interval must be greater than 0".to_string(),
            ));
        }

        if self.extension.is_empty() || self.extension.contains(['.', '/', '\\']) {
            return Err(ConfigError::ValidationFailed(format!(
                "extension '{}' must be a bare, non-empty extension",
                self.extension
            )));
        }

        if let Some(index) = &self.index_file {
            if index.is_empty() || Path::new(index).components().count() != 1 {
                return Err(ConfigError::ValidationFailed(format!(
                    "index_file '{}' must be a plain file name",
                    index
                )));
            }
        }

        Ok(())
    }

    /// Builder method to move the project root, re-deriving the source and
    /// output directories from it.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        let layout = Self::for_root(root);
        self.root = layout.root;
        self.source_dir = layout.source_dir;
        self.output_dir = layout.output_dir;
        self
    }

    /// Builder method to set the source directory.
    pub fn with_source_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_dir = path.into();
        self
    }

    /// Builder method to set the output directory.
    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    /// Builder method to set the generated file extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Builder method to enable index generation under the given file name.
    pub fn with_index_file(mut self, name: impl Into<String>) -> Self {
        self.index_file = Some(name.into());
        self
    }

    /// Builder method to toggle verbose per-file output.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Builder method to set the Work Counter sizing policy.
    pub fn with_count_policy(mut self, policy: CountPolicy) -> Self {
        self.count_policy = policy;
        self
    }

    /// Builder method to set the progress tick interval.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Builder method to set the write concurrency limit.
    pub fn with_max_concurrent_writes(mut self, max: usize) -> Self {
        self.max_concurrent_writes = max;
        self
    }
}

/// Parse an environment variable value into a type.
fn parse_env_value<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("could not parse '{}'", value),
    })
}
