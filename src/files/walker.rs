//! Recursive source tree traversal.
//!
//! [`walk`] mirrors the live filesystem shape: each directory is listed, every
//! entry is stat'ed and visited without waiting on its siblings, and every
//! regular file is read and handed to the callback. There is no ordering
//! guarantee across files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::{try_join_all, BoxFuture, FutureExt};
use tokio::fs;
use tracing::trace;
use walkdir::WalkDir;

use crate::error::WalkError;

use super::FileHandle;

/// Callback invoked once per leaf file.
pub type FileCallback = Arc<dyn Fn(FileHandle) + Send + Sync>;

/// Walks `root`, calling `on_file` for every leaf file underneath it.
///
/// When `root` is itself a regular file it is the only leaf. Returns the
/// number of files visited.
pub async fn walk<F>(root: impl AsRef<Path>, on_file: F) -> Result<usize, WalkError>
where
    F: Fn(FileHandle) + Send + Sync + 'static,
{
    let root = root.as_ref().to_path_buf();
    let metadata = fs::metadata(&root).await.map_err(|source| WalkError::Stat {
        path: root.clone(),
        source,
    })?;

    visit(root, metadata.is_dir(), Arc::new(on_file)).await
}

fn visit(
    path: PathBuf,
    is_dir: bool,
    on_file: FileCallback,
) -> BoxFuture<'static, Result<usize, WalkError>> {
    visit_entry(path, is_dir, on_file).boxed()
}

async fn visit_entry(
    path: PathBuf,
    is_dir: bool,
    on_file: FileCallback,
) -> Result<usize, WalkError> {
    if !is_dir {
        let content = fs::read_to_string(&path)
            .await
            .map_err(|source| WalkError::Read {
                path: path.clone(),
                source,
            })?;
        trace!(path = %path.display(), bytes = content.len(), "Read leaf file");
        on_file(FileHandle::new(path, content));
        return Ok(1);
    }

    let read_dir_err = |source: std::io::Error| WalkError::ReadDir {
        path: path.clone(),
        source,
    };
    let mut entries = fs::read_dir(&path).await.map_err(read_dir_err)?;

    let mut children = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_dir_err)? {
        let child = entry.path();
        let on_file = on_file.clone();
        children.push(async move {
            match fs::metadata(&child).await {
                Ok(metadata) => visit(child, metadata.is_dir(), on_file).await,
                Err(source) => Err(WalkError::Stat {
                    path: child,
                    source,
                }),
            }
        });
    }

    let visited = try_join_all(children).await?;
    Ok(visited.into_iter().sum())
}

/// Counts every non-directory entry below `root`, following symlinks the same
/// way [`walk`] does.
pub fn count_leaf_files(root: impl AsRef<Path>) -> Result<usize, WalkError> {
    let root = root.as_ref();
    let mut count = 0usize;

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|err| {
            let path = err
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf());
            WalkError::ReadDir {
                path,
                source: err.into(),
            }
        })?;
        if !entry.file_type().is_dir() {
            count += 1;
        }
    }

    Ok(count)
}
