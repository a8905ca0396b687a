//! In-memory file handle.

use std::path::{Path, PathBuf};

use tokio::fs;

/// A filesystem path paired with textual content.
///
/// Both fields are public and rewritten in place by the transform stage before
/// the handle is persisted with [`FileHandle::write`]. Derived values such as
/// [`FileHandle::name`] always reflect the current path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub path: PathBuf,
    pub content: String,
}

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Parent directory of the current path (empty for a bare file name).
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Last path segment, optionally without its extension.
    pub fn name(&self, include_extension: bool) -> String {
        let segment = if include_extension {
            self.path.file_name()
        } else {
            self.path.file_stem()
        };
        segment
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Writes `content` to `path` as UTF-8 text.
    pub async fn write(&self) -> std::io::Result<()> {
        fs::write(&self.path, self.content.as_bytes()).await
    }

    /// Returns whether `path` can be stat'ed. Never fails.
    pub async fn exists(path: impl AsRef<Path>) -> bool {
        fs::metadata(path.as_ref()).await.is_ok()
    }

    /// Number of immediate entries in a directory; `0` when `path` is not one.
    pub async fn count(path: impl AsRef<Path>) -> std::io::Result<usize> {
        let path = path.as_ref();
        if !fs::metadata(path).await?.is_dir() {
            return Ok(0);
        }

        let mut entries = fs::read_dir(path).await?;
        let mut count = 0usize;
        while entries.next_entry().await?.is_some() {
            count += 1;
        }
        Ok(count)
    }

    /// Creates `path` and its parents unless it already exists.
    pub async fn create_dir(path: impl AsRef<Path>) -> std::io::Result<()> {
        let path = path.as_ref();
        if Self::exists(path).await {
            return Ok(());
        }
        fs::create_dir_all(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_name_with_and_without_extension() {
        let file = FileHandle::new("icons/svg/account-alert.svg", "<svg/>");
        assert_eq!(file.name(false), "account-alert");
        assert_eq!(file.name(true), "account-alert.svg");
        assert_eq!(file.dir(), Path::new("icons/svg"));
    }

    #[test]
    fn test_name_tracks_renamed_path() {
        let mut file = FileHandle::new("svg/abc.svg", "");
        file.path = PathBuf::from("build/Abc.svelte");
        assert_eq!(file.name(false), "Abc");
        assert_eq!(file.name(true), "Abc.svelte");
        assert_eq!(file.dir(), Path::new("build"));
    }

    #[test]
    fn test_dir_of_bare_name_is_empty() {
        let file = FileHandle::new("alpha.svg", "");
        assert_eq!(file.dir(), Path::new(""));
    }

    #[tokio::test]
    async fn test_write_and_exists() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("Alpha.svelte");
        assert!(!FileHandle::exists(&path).await);

        FileHandle::new(&path, "<svg></svg>")
            .write()
            .await
            .expect("write should succeed");

        assert!(FileHandle::exists(&path).await);
        let written = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(written, "<svg></svg>");
    }

    #[tokio::test]
    async fn test_write_into_missing_directory_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file = FileHandle::new(temp_dir.path().join("missing/Alpha.svelte"), "x");
        assert!(file.write().await.is_err());
    }

    #[tokio::test]
    async fn test_count_is_not_recursive() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(temp_dir.path().join("a.svg"), "a").unwrap();
        std::fs::create_dir(temp_dir.path().join("nested")).unwrap();
        std::fs::write(temp_dir.path().join("nested/b.svg"), "b").unwrap();
        std::fs::write(temp_dir.path().join("nested/c.svg"), "c").unwrap();

        assert_eq!(FileHandle::count(temp_dir.path()).await.unwrap(), 2);
        assert_eq!(
            FileHandle::count(temp_dir.path().join("a.svg")).await.unwrap(),
            0
        );
        assert!(FileHandle::count(temp_dir.path().join("nope")).await.is_err());
    }

    #[tokio::test]
    async fn test_create_dir_is_idempotent() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let out = temp_dir.path().join("build/deep");
        FileHandle::create_dir(&out).await.unwrap();
        FileHandle::create_dir(&out).await.unwrap();
        assert!(out.is_dir());
    }
}
