//! Per-file analysis for sortmedia.
//!
//! This crate turns a path on disk into a [`MediaFile`]:
//!
//! - **Fingerprinting** - full-content BLAKE3 digest
//! - **Type sniffing** - MIME type from file content, mapped to photo/video
//! - **Creation dates** - EXIF for photos, `ffprobe` container tags for videos
//!
//! ```rust,no_run
//! use sortmedia_analyze::{MediaFile, MetadataResolver};
//!
//! let resolver = MetadataResolver::new();
//! if let Some(file) = MediaFile::from_path("/photos/IMG_0001.jpg").unwrap() {
//!     match file.creation_date(&resolver) {
//!         Some(date) => println!("{} taken on {}", file.path().display(), date.year),
//!         None => println!("{} has no usable date", file.path().display()),
//!     }
//! }
//! ```

mod error;
mod fingerprint;
mod media_file;
pub mod mime;
mod photo;
mod temporal;
mod video;

pub use error::AnalyzeError;
pub use fingerprint::fingerprint;
pub use media_file::MediaFile;
pub use photo::{parse_exif_datetime, ExifDateSource};
pub use temporal::{DateSource, MetadataResolver, TemporalResolver};
pub use video::{parse_probe_output, FfprobeDateSource};

// Re-export core types
pub use sortmedia_core::{CreationDate, Fingerprint, MediaKind};
