//! Error types for sorting runs.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a run before any work is attempted.
#[derive(Debug, Error)]
pub enum SortError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Source root is not a directory.
    #[error("Source path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

impl SortError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_error_io_maps_kinds() {
        let err = SortError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, SortError::PermissionDenied { .. }));

        let err = SortError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(matches!(err, SortError::NotFound { .. }));

        let err = SortError::io("/test/path", std::io::Error::other("boom"));
        assert!(matches!(err, SortError::Io { .. }));
    }

    #[test]
    fn test_not_a_directory_message() {
        let err = SortError::NotADirectory {
            path: PathBuf::from("/tmp/file.jpg"),
        };
        assert_eq!(err.to_string(), "Source path is not a directory: /tmp/file.jpg");
    }
}
