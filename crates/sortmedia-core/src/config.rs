//! Run configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::media::TransferMode;
use crate::policy::DirectoryPolicy;

/// Bucket directory used when no creation date can be resolved.
pub const DEFAULT_UNKNOWN_BUCKET: &str = "unknown";

/// Configuration for a single sorting run.
///
/// Every run builds its own value; nothing here is shared between runs.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct SortConfig {
    /// Source tree to walk.
    pub source: PathBuf,

    /// Root of the date-based destination layout.
    pub destination: PathBuf,

    /// Move or copy files into place.
    #[builder(default)]
    #[serde(default)]
    pub mode: TransferMode,

    /// Classify and log only; never touch the filesystem.
    #[builder(default = "false")]
    #[serde(default)]
    pub dry_run: bool,

    /// Exclude and no-process directories.
    #[builder(default)]
    #[serde(default)]
    pub policy: DirectoryPolicy,

    /// Follow symbolic links instead of skipping them.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Directory name for files without a resolvable creation date.
    #[builder(default = "DEFAULT_UNKNOWN_BUCKET.to_string()")]
    #[serde(default = "default_unknown_bucket")]
    pub unknown_bucket: String,
}

fn default_unknown_bucket() -> String {
    DEFAULT_UNKNOWN_BUCKET.to_string()
}

impl SortConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        let source = match self.source {
            Some(ref source) if !source.as_os_str().is_empty() => source,
            Some(_) => return Err("Source path cannot be empty".to_string()),
            None => return Err("Source path is required".to_string()),
        };
        let destination = match self.destination {
            Some(ref destination) if !destination.as_os_str().is_empty() => destination,
            Some(_) => return Err("Destination path cannot be empty".to_string()),
            None => return Err("Destination path is required".to_string()),
        };
        if source == destination {
            return Err("Source and destination must differ".to_string());
        }
        if let Some(ref bucket) = self.unknown_bucket {
            if bucket.is_empty() || bucket.contains(std::path::is_separator) {
                return Err(format!("Invalid unknown bucket name: {bucket:?}"));
            }
        }
        Ok(())
    }
}

impl SortConfig {
    /// Create a new config builder.
    pub fn builder() -> SortConfigBuilder {
        SortConfigBuilder::default()
    }

    /// Create a move-mode config with no directory policy.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            mode: TransferMode::Move,
            dry_run: false,
            policy: DirectoryPolicy::default(),
            follow_symlinks: false,
            unknown_bucket: default_unknown_bucket(),
        }
    }

    /// Whether files are copied rather than moved.
    pub fn is_copy(&self) -> bool {
        self.mode == TransferMode::Copy
    }
}
