//! Placement and transfer engine for sortmedia.
//!
//! Given a [`MediaFile`](sortmedia_analyze::MediaFile), this crate decides
//! where it belongs and puts it there:
//!
//! - [`write_check`] classifies a candidate path as empty, identical or
//!   conflicting
//! - [`PlacementResolver`] walks `name`, `name_1`, `name_2`, ... under the
//!   date prefix until a slot is empty or already holds the same content
//! - [`apply`] moves or copies the file into the chosen slot
//! - [`transfer_subtree`] relocates a whole no-process directory

mod action;
mod error;
mod placement;
mod subtree;

pub use action::{apply, transfer_file};
pub use error::TransferError;
pub use placement::{candidate_path, write_check, PlacementResolver};
pub use subtree::{subtree_target, transfer_subtree, SubtreeTransfer};

// Re-export core types
pub use sortmedia_core::{PlacementOutcome, TransferMode};
