//! Filesystem primitives for the build pipeline.
//!
//! - [`FileHandle`]: a path paired with its in-memory text content
//! - [`walk`]: concurrent recursive traversal invoking a callback per leaf file
//! - [`count_leaf_files`]: recursive leaf-file count used for progress sizing

pub mod handle;
pub mod walker;

pub use handle::FileHandle;
pub use walker::{count_leaf_files, walk, FileCallback};
