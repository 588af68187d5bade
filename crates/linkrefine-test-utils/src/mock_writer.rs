//! Page writer that records writes and can be told to fail.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use linkrefine_graph::{FsPageWriter, PageWriter, RefineError, Result};

/// Records every write; writes to disk too when built with [`RecordingWriter::to_disk`].
#[derive(Debug, Default)]
pub struct RecordingWriter {
    pub writes: Vec<(PathBuf, String)>,
    failing: HashSet<PathBuf>,
    disk: Option<FsPageWriter>,
}

impl RecordingWriter {
    /// In-memory only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record and write through to the filesystem.
    pub fn to_disk() -> Self {
        Self {
            disk: Some(FsPageWriter::new()),
            ..Self::default()
        }
    }

    /// Fail every write to `path` with a permission error.
    pub fn failing_on(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing.insert(path.into());
        self
    }

    pub fn written_paths(&self) -> Vec<&Path> {
        self.writes.iter().map(|(p, _)| p.as_path()).collect()
    }
}

impl PageWriter for RecordingWriter {
    fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        if self.failing.contains(path) {
            return Err(RefineError::FileWrite {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "write refused by test writer",
                ),
            });
        }
        if let Some(disk) = self.disk.as_mut() {
            disk.write(path, content)?;
        }
        self.writes.push((path.to_path_buf(), content.to_string()));
        Ok(())
    }
}
