//! Error types for file analysis.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while analyzing a single file.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// Reading the file failed.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The EXIF block exists but could not be parsed.
    #[error("Malformed EXIF data in {path}: {source}")]
    Exif {
        path: PathBuf,
        #[source]
        source: ::exif::Error,
    },

    /// The probe binary could not be found.
    #[error("ffprobe not found at {program}")]
    ProbeNotFound { program: PathBuf },

    /// The probe binary ran but did not succeed.
    #[error("ffprobe failed for {path}: {message}")]
    ProbeFailed { path: PathBuf, message: String },

    /// The probe output was not the expected JSON.
    #[error("Unexpected ffprobe output for {path}: {source}")]
    ProbeOutput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl AnalyzeError {
    /// Create a read error with path context.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}
