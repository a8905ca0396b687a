//! Generated barrel index.

use std::path::Path;

use crate::files::FileHandle;

/// Accumulated `export` statements, one per written component.
#[derive(Debug, Clone, Default)]
pub struct IndexBlob {
    extension: String,
    text: String,
    entries: usize,
}

impl IndexBlob {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            text: String::new(),
            entries: 0,
        }
    }

    /// `export { default as Name } from "./Name.ext";`
    pub fn export_line(name: &str, extension: &str) -> String {
        format!(
            "export {{ default as {name} }} from \"./{name}.{extension}\";",
            name = name,
            extension = extension
        )
    }

    /// Appends the export statement for a component base name.
    pub fn push(&mut self, name: &str) {
        self.text.push_str(&Self::export_line(name, &self.extension));
        self.text.push('\n');
        self.entries += 1;
    }

    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Writes the accumulated text to `path`.
    pub async fn persist(&self, path: &Path) -> std::io::Result<()> {
        FileHandle::new(path, self.text.as_str()).write().await
    }
}
