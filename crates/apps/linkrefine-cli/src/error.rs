//! CLI error types.

use linkrefine_graph::RefineError;
use thiserror::Error;

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error enum wrapping all crate errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Scanning or refinement error.
    #[error("{0}")]
    Refine(#[from] RefineError),

    /// IO error.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// User-facing error with actionable message.
    #[error("{0}")]
    User(String),

    /// The interactive session was interrupted.
    #[error("Aborted: {0}")]
    Aborted(String),
}

impl CliError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a user-facing error.
    pub fn user(msg: impl Into<String>) -> Self {
        Self::User(msg.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors: 1
            Self::User(_) => 1,
            // Corpus errors: 2
            Self::Refine(RefineError::CorpusAccess { .. })
            | Self::Refine(RefineError::Collision { .. })
            | Self::Refine(RefineError::UnknownPage(_)) => 2,
            // Config errors: 3
            Self::Config(_) | Self::Toml(_) | Self::Refine(RefineError::InvalidConfig(_)) => 3,
            // File errors: 4
            Self::Refine(_) => 4,
            // Interrupted: 5
            Self::Aborted(_) => 5,
            // IO errors: 9
            Self::Io(_) => 9,
            // JSON/format errors: 10
            Self::Json(_) => 10,
        }
    }

    /// A short recovery hint, if there is one.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Refine(RefineError::CorpusAccess { .. }) => {
                Some("Check the paths; with --logseq each path must contain pages/ and journals/.")
            }
            Self::Refine(RefineError::Collision { .. }) => {
                Some("Rename one of the files or set scan.collision_policy to last-wins.")
            }
            Self::Config(_) | Self::Toml(_) | Self::Refine(RefineError::InvalidConfig(_)) => {
                Some("Fix the configuration file or pass --config to use another one.")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes_are_distinct_per_category() {
        let corpus = CliError::from(RefineError::CorpusAccess {
            path: PathBuf::from("missing"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
        let write = CliError::from(RefineError::FileWrite {
            path: PathBuf::from("a.md"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        });

        assert_eq!(CliError::user("x").exit_code(), 1);
        assert_eq!(corpus.exit_code(), 2);
        assert_eq!(CliError::config("x").exit_code(), 3);
        assert_eq!(
            CliError::from(RefineError::InvalidConfig("x".into())).exit_code(),
            3
        );
        assert_eq!(write.exit_code(), 4);
        assert_eq!(CliError::Aborted("x".into()).exit_code(), 5);
    }

    #[test]
    fn test_refine_error_message_passes_through() {
        let err = CliError::from(RefineError::UnknownPage("Ghost".into()));
        assert_eq!(err.to_string(), "Unknown page: Ghost");
    }

    #[test]
    fn test_hint() {
        assert!(CliError::config("bad").hint().is_some());
        assert!(CliError::user("bad").hint().is_none());
    }
}
