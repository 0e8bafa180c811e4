//! Error types for placement and transfer.

use std::path::PathBuf;

use sortmedia_analyze::AnalyzeError;
use thiserror::Error;

/// Errors that can occur while placing or transferring files.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Intermediate directories could not be created.
    #[error("Failed to create directory {path}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Copying a file failed.
    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Moving a file failed.
    #[error("Failed to move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source or candidate file could not be sniffed or fingerprinted.
    #[error("Fingerprinting failed: {0}")]
    Fingerprint(#[from] AnalyzeError),

    /// The target of a subtree transfer is already present.
    #[error("Destination already exists: {path}")]
    DestinationExists { path: PathBuf },

    /// The source has no file name to place under.
    #[error("Source has no file name: {path}")]
    NoFileName { path: PathBuf },

    /// A subtree root is missing or is not a directory.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// The destination lies inside the subtree being transferred.
    #[error("Cannot transfer {root} into itself ({target})")]
    SourceIsAncestor { root: PathBuf, target: PathBuf },

    /// Bulk transfer of a subtree failed.
    #[error("Failed to transfer {root} to {target}: {source}")]
    Subtree {
        root: PathBuf,
        target: PathBuf,
        #[source]
        source: fs_extra::error::Error,
    },
}

impl TransferError {
    /// Create a directory creation error.
    pub fn directory(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreation {
            path: path.into(),
            source,
        }
    }
}
