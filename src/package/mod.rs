//! Release packaging.
//!
//! Copies the files published alongside the generated components into the
//! build directory: the project's `package.json` and `README.md`, and the
//! upstream icon-set `LICENSE`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::info;

use crate::error::PackageError;
use crate::files::FileHandle;
use crate::pipeline::BuildConfig;

/// Fields of `package.json` reported after packaging.
#[derive(Debug, Clone, Default, Deserialize)]
struct PackageManifest {
    name: Option<String>,
    version: Option<String>,
}

/// Summary of a packaging run.
#[derive(Debug, Clone, Serialize)]
pub struct PackageReport {
    pub name: Option<String>,
    pub version: Option<String>,
    pub copied: Vec<PathBuf>,
}

/// Source and destination of every release file, in copy order.
pub fn release_files(config: &BuildConfig) -> Vec<(PathBuf, PathBuf)> {
    let out = &config.output_dir;
    vec![
        (config.root.join("package.json"), out.join("package.json")),
        (config.submodule_dir().join("LICENSE"), out.join("LICENSE")),
        (config.root.join("README.md"), out.join("README.md")),
    ]
}

/// Copies the release files into the output directory.
///
/// # Errors
///
/// Fails on the first file that cannot be copied, or when `package.json`
/// is not valid JSON.
pub async fn copy_release_files(config: &BuildConfig) -> Result<PackageReport, PackageError> {
    FileHandle::create_dir(&config.output_dir)
        .await
        .map_err(|source| PackageError::CreateOutput {
            path: config.output_dir.clone(),
            source,
        })?;

    let mut copied = Vec::new();
    for (from, to) in release_files(config) {
        fs::copy(&from, &to)
            .await
            .map_err(|source| PackageError::Copy {
                file: from.display().to_string(),
                source,
            })?;
        info!(from = %from.display(), to = %to.display(), "Copied release file");
        copied.push(to);
    }

    let manifest: PackageManifest =
        serde_json::from_str(&fs::read_to_string(config.output_dir.join("package.json")).await?)?;

    Ok(PackageReport {
        name: manifest.name,
        version: manifest.version,
        copied,
    })
}
