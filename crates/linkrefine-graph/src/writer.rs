//! Write-back of refined page content.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{RefineError, Result};

/// Persists refined content.
///
/// A write is either fully applied or not applied at all; failures are
/// returned as [`RefineError::FileWrite`], never panics.
pub trait PageWriter {
    fn write(&mut self, path: &Path, content: &str) -> Result<()>;
}

/// Writes pages to the filesystem atomically.
///
/// Content goes to a temporary file next to the target, which then replaces
/// the target with a rename. Existing file permissions are carried over.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsPageWriter;

impl FsPageWriter {
    pub fn new() -> Self {
        Self
    }

    fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        if let Ok(meta) = fs::metadata(path) {
            tmp.as_file().set_permissions(meta.permissions())?;
        }
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl PageWriter for FsPageWriter {
    fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        Self::write_atomic(path, content).map_err(|source| RefineError::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = content.len(), "Page written");
        Ok(())
    }
}
