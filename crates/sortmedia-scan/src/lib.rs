//! Source tree traversal and run orchestration for sortmedia.
//!
//! A run moves through four phases:
//!
//! 1. **Initializing** - the source root must exist and be a directory
//! 2. **Processing no-process roots** - each is moved or copied as a unit
//! 3. **Walking the tree** - every remaining file is classified, and
//!    photos and videos are placed under `<year>/<month>/<day>`
//! 4. **Finalizing** - totals are logged and returned
//!
//! # Example
//!
//! ```rust,no_run
//! use sortmedia_scan::{MediaSorter, SortConfig};
//!
//! let config = SortConfig::new("/media/inbox", "/media/library");
//! let report = MediaSorter::new().run(&config).unwrap();
//!
//! println!("Placed {} files", report.stats.total_processed());
//! println!("Skipped {} duplicates", report.stats.duplicates);
//! ```

mod phase;
mod sorter;

pub use phase::RunPhase;
pub use sorter::MediaSorter;

// Re-export core types for convenience
pub use sortmedia_core::{
    DirectoryPolicy, FileFailure, RunReport, RunStatistics, SortConfig, SortError, TransferMode,
};
