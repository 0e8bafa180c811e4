//! Core types and traits for sortmedia.
//!
//! This crate provides the fundamental data structures shared by the
//! placement engine: content fingerprints, media kinds, resolved creation
//! dates, run configuration, directory policy and run statistics.

mod config;
mod error;
mod media;
mod policy;
mod stats;

pub use config::{SortConfig, SortConfigBuilder, DEFAULT_UNKNOWN_BUCKET};
pub use error::SortError;
pub use media::{CreationDate, Fingerprint, MediaKind, PlacementOutcome, TransferMode};
pub use policy::{normalize_path, DirectoryPolicy, PathClass, PolicyClassifier};
pub use stats::{FileFailure, RunReport, RunStatistics};
