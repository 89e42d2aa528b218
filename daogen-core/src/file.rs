//! Output-file handling for generated source.

use std::path::{Path, PathBuf};

use eyre::Result;

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written
    Written,
    /// File was skipped (already exists)
    Skipped,
}

/// A single generated source file, ready to be written to disk.
///
/// Generation itself performs no I/O; the pipeline produces `OutputFile`
/// values and the caller decides where (or whether) they land.
#[derive(Debug, Clone)]
pub struct OutputFile {
    path: PathBuf,
    content: String,
}

impl OutputFile {
    /// Create a new output file with the given relative path and content.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// The path of this file relative to the output base directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The rendered content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Write the file under `base`, creating parent directories as needed.
    pub fn write(&self, base: &Path) -> Result<WriteResult> {
        let path = base.join(&self.path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, &self.content)?;
        Ok(WriteResult::Written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp = std::env::temp_dir().join(format!("daogen-core-test-{}", std::process::id()));
        let file = OutputFile::new("nested/dir/out.kt", "object Orders");

        let result = file.write(&temp).unwrap();

        assert_eq!(result, WriteResult::Written);
        let written = std::fs::read_to_string(temp.join("nested/dir/out.kt")).unwrap();
        assert_eq!(written, "object Orders");
        std::fs::remove_dir_all(&temp).ok();
    }
}
