//! Icon build pipeline.
//!
//! # Architecture
//!
//! - **Config**: source/output layout, extension, index and concurrency settings
//! - **Driver**: the `Bootstrapping → Preparing → Walking → Draining → Done`
//!   state machine coordinating a build
//! - **Counter**: remaining/total writes shared with the progress line
//! - **Index**: the generated barrel file text
//! - **Progress**: the `done/total spinner` terminal line
//!
//! # Pipeline Flow
//!
//! 1. **Bootstrap**: initialize the icon submodule if the source directory is missing
//! 2. **Prepare**: create the output directory
//! 3. **Walk**: enumerate every leaf file of the source tree concurrently
//! 4. **Transform + write**: rename and rewrite each icon into a component
//! 5. **Aggregate**: count completions and collect index lines in one task
//! 6. **Finish**: write the index once and report
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use iconforge::pipeline::{BuildConfig, PipelineDriver};
//! use iconforge::vcs::ShellRunner;
//!
//! let config = BuildConfig::for_root(".").with_index_file("index.js");
//! let mut driver = PipelineDriver::new(config, Arc::new(ShellRunner::new()));
//! let report = driver.run().await?;
//! println!("Built {} components", report.written);
//! ```

pub mod config;
pub mod counter;
pub mod driver;
pub mod index;
pub mod progress;

// Re-export main types for convenience
pub use config::{BuildConfig, ConfigError, CountPolicy, DEFAULT_INDEX_FILE};
pub use counter::WorkCounter;
pub use driver::{BuildReport, PipelineDriver, PipelineState};
pub use index::IndexBlob;
pub use progress::{render_line, ProgressReporter, Spinner};
