//! Error types for corpus scanning and link refinement.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, RefineError>;

/// Errors that can occur while scanning a corpus or refining its links.
#[derive(Debug, Error)]
pub enum RefineError {
    /// A corpus root is missing or cannot be listed. Aborts the run.
    #[error("Cannot access corpus directory {}: {source}", path.display())]
    CorpusAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single file could not be read or decoded. The scan continues.
    #[error("Cannot read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing refined content back failed. Only that apply step is aborted.
    #[error("Cannot write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two files resolve to the same page identity under the `error` policy.
    #[error("Page identity '{page}' is claimed by both {} and {}", first.display(), second.display())]
    Collision {
        page: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// The page identity was never scanned.
    #[error("Unknown page: {0}")]
    UnknownPage(String),

    /// A proposal no longer matches the page it was computed from.
    #[error("Proposal for '{0}' is stale: the page changed since it was computed")]
    StaleProposal(String),

    /// A configuration value is out of range or inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RefineError {
    /// Whether the run may continue after this error.
    ///
    /// Unreadable files and failed writes only affect one page; everything
    /// else stops the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::FileRead { .. } | Self::FileWrite { .. })
    }

    /// Path of the file or directory involved, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::CorpusAccess { path, .. }
            | Self::FileRead { path, .. }
            | Self::FileWrite { path, .. } => Some(path),
            Self::Collision { second, .. } => Some(second),
            Self::UnknownPage(_) | Self::StaleProposal(_) | Self::InvalidConfig(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_recoverable_classification() {
        let read = RefineError::FileRead {
            path: PathBuf::from("a.md"),
            source: io::Error::new(io::ErrorKind::InvalidData, "bad utf-8"),
        };
        let write = RefineError::FileWrite {
            path: PathBuf::from("b.md"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        };
        let access = RefineError::CorpusAccess {
            path: PathBuf::from("missing"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such directory"),
        };

        assert!(read.is_recoverable());
        assert!(write.is_recoverable());
        assert!(!access.is_recoverable());
        assert!(!RefineError::UnknownPage("A".into()).is_recoverable());
    }

    #[test]
    fn test_error_messages_name_the_path() {
        let err = RefineError::FileWrite {
            path: PathBuf::from("notes/B.md"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        };
        assert_eq!(err.to_string(), "Cannot write notes/B.md: read-only");
        assert_eq!(err.path(), Some(&PathBuf::from("notes/B.md")));
    }
}
