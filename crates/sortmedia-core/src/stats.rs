//! Run statistics and report.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::media::MediaKind;

/// Counters accumulated over one run. They only ever increase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Photos selected for placement.
    pub photos: u64,
    /// Videos selected for placement.
    pub videos: u64,
    /// Files already present at their destination.
    pub duplicates: u64,
    /// Excluded paths seen by the walk: exclude roots and excluded files.
    pub excluded: u64,
    /// Symlinks and other non-regular entries passed over.
    pub skipped: u64,
    /// Files whose fingerprinting or transfer failed.
    pub failed: u64,
    /// No-process roots transferred wholesale.
    pub no_process_roots: u64,
    /// Bytes written into the destination tree by per-file transfers.
    pub bytes_transferred: u64,
}

impl RunStatistics {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file selected for placement.
    pub fn record_media(&mut self, kind: MediaKind) {
        match kind {
            MediaKind::Photo => self.photos += 1,
            MediaKind::Video => self.videos += 1,
        }
    }

    /// Record a completed transfer.
    pub fn record_transfer(&mut self, bytes: u64) {
        self.bytes_transferred += bytes;
    }

    /// Record a file skipped because identical content was already placed.
    pub fn record_duplicate(&mut self) {
        self.duplicates += 1;
    }

    /// Record an excluded path.
    pub fn record_excluded(&mut self) {
        self.excluded += 1;
    }

    /// Record a non-regular entry that was passed over.
    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Record a per-file failure.
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Record a no-process root transferred wholesale.
    pub fn record_no_process_root(&mut self) {
        self.no_process_roots += 1;
    }

    /// Photos plus videos.
    pub fn total_processed(&self) -> u64 {
        self.photos + self.videos
    }
}

/// A per-file failure that did not abort the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    /// Path that failed.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
}

impl FileFailure {
    /// Create a new failure record.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FileFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// Aggregate counters.
    pub stats: RunStatistics,
    /// Failures that were logged and skipped.
    pub failures: Vec<FileFailure>,
    /// Whether the run was a dry run.
    pub dry_run: bool,
    /// Wall-clock duration of the run.
    pub duration: Duration,
}

impl RunReport {
    /// Check if every selected file was handled without error.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
