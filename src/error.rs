use thiserror::Error;

/// Unified error type for release-tagger operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The exact version and commit were already released. Callers treat this
    /// as a successful no-op rather than a failure.
    #[error("{0}")]
    DuplicateRelease(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("GitHub API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in release-tagger
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create an input validation error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        ReleaseError::InvalidInput(msg.into())
    }

    /// Create a duplicate release signal
    pub fn duplicate(msg: impl Into<String>) -> Self {
        ReleaseError::DuplicateRelease(msg.into())
    }

    /// Create a conflict error (existing release or invalid bump)
    pub fn conflict(msg: impl Into<String>) -> Self {
        ReleaseError::Conflict(msg.into())
    }

    /// Create a not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        ReleaseError::NotFound(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::Version(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, ReleaseError::DuplicateRelease(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ReleaseError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReleaseError::config("missing api url");
        assert_eq!(err.to_string(), "Configuration error: missing api url");
    }

    #[test]
    fn test_duplicate_and_conflict_display_message_only() {
        let dup = ReleaseError::duplicate("Release 1.0.0 already exists for this sha.");
        assert_eq!(dup.to_string(), "Release 1.0.0 already exists for this sha.");

        let conflict =
            ReleaseError::conflict("Release 1.0.0 already exists for a different commit");
        assert_eq!(
            conflict.to_string(),
            "Release 1.0.0 already exists for a different commit"
        );
    }

    #[test]
    fn test_error_kind_predicates() {
        assert!(ReleaseError::duplicate("x").is_duplicate());
        assert!(!ReleaseError::conflict("x").is_duplicate());
        assert!(ReleaseError::not_found("refs/tags/v1").is_not_found());
        assert!(!ReleaseError::Api {
            status: 500,
            message: "boom".to_string()
        }
        .is_not_found());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReleaseError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
        // An I/O not-found is a hard failure, not a missing ref
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ReleaseError::invalid_input("x"), "Invalid input"),
            (ReleaseError::version("x"), "Version parsing error"),
            (ReleaseError::config("x"), "Configuration error"),
            (ReleaseError::not_found("x"), "Not found"),
            (
                ReleaseError::Api {
                    status: 502,
                    message: "x".to_string(),
                },
                "GitHub API request failed",
            ),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
