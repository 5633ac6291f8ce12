//! File-system access used by the pipeline.
//!
//! All reads and writes go through [`FileSystem`] so tests can observe
//! exactly which files a stage touches.

use crate::error::RenderError;
use std::path::Path;

/// The handful of file operations the pipeline needs.
pub trait FileSystem {
    /// Whether `path` exists and can be opened.
    fn exists(&self, path: &Path) -> bool;

    /// Reads a whole text file.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::FileNotFound` if the file cannot be read.
    fn read_to_string(&self, path: &Path) -> Result<String, RenderError>;

    /// Writes `bytes` to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Io` if the write fails.
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), RenderError>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn exists(&self, path: &Path) -> bool {
        std::fs::File::open(path).is_ok()
    }

    fn read_to_string(&self, path: &Path) -> Result<String, RenderError> {
        std::fs::read_to_string(path).map_err(|_| RenderError::FileNotFound {
            path: path.display().to_string(),
        })
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
        std::fs::write(path, bytes).map_err(|e| RenderError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
