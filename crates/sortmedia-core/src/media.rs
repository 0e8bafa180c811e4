//! Media file identity and placement types.

use chrono::{Datelike, NaiveDate};
use compact_str::{format_compact, CompactString};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// BLAKE3 digest of a file's full byte content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub [u8; 32]);

impl Fingerprint {
    /// Create a new Fingerprint from raw bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the digest as a hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Kind of media file, derived from the MIME type prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// `image/*`
    Photo,
    /// `video/*`
    Video,
}

impl MediaKind {
    /// Classify a MIME type string. Anything that is neither an image nor a
    /// video yields `None`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        if mime.starts_with("image/") {
            Some(Self::Photo)
        } else if mime.starts_with("video/") {
            Some(Self::Video)
        } else {
            None
        }
    }
}

/// A resolved creation date, already split into the directory components
/// used for placement.
///
/// The three components are always populated together; an unresolvable date
/// is represented by the absence of a `CreationDate`, never a partial one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreationDate {
    /// Decimal year, e.g. `2099`.
    pub year: CompactString,
    /// Full English month name, e.g. `September`.
    pub month: CompactString,
    /// Unpadded day of month, e.g. `29`.
    pub day: CompactString,
}

impl CreationDate {
    /// Build from a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: format_compact!("{}", date.year()),
            month: format_compact!("{}", date.format("%B")),
            day: format_compact!("{}", date.day()),
        }
    }

    /// Build from numeric parts, returning `None` for an invalid date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::from_date)
    }

    /// Directory components in placement order: year, month, day.
    pub fn components(&self) -> [&str; 3] {
        [self.year.as_str(), self.month.as_str(), self.day.as_str()]
    }
}

/// Classification of a candidate destination path against a source
/// fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum PlacementOutcome {
    /// Nothing exists at the candidate; safe to write.
    Empty,
    /// An entry with the same fingerprint already exists.
    Identical,
    /// An entry with a different fingerprint exists; must not overwrite.
    Conflicting,
}

/// How files are transferred into the destination tree.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    /// Remove the source after a successful transfer.
    #[default]
    Move,
    /// Leave the source untouched.
    Copy,
}
