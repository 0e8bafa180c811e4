//! A photo or video selected for placement.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use sortmedia_core::{CreationDate, Fingerprint, MediaKind};

use crate::temporal::TemporalResolver;
use crate::{fingerprint, mime, AnalyzeError};

/// One source file selected for placement.
///
/// The fingerprint is computed once, from the whole file, at construction.
/// If the file changes afterwards this value is stale; nothing here guards
/// against that.
#[derive(Debug)]
pub struct MediaFile {
    path: PathBuf,
    kind: MediaKind,
    mime: String,
    fingerprint: Fingerprint,
    size: u64,
    creation_date: OnceCell<Option<CreationDate>>,
}

impl MediaFile {
    /// Fingerprint `path` as a media file of the given kind.
    pub fn open(
        path: impl Into<PathBuf>,
        kind: MediaKind,
        mime: impl Into<String>,
    ) -> Result<Self, AnalyzeError> {
        let path = path.into();
        let size = std::fs::metadata(&path)
            .map_err(|e| AnalyzeError::read(&path, e))?
            .len();
        let fingerprint = fingerprint(&path)?;

        Ok(Self {
            path,
            kind,
            mime: mime.into(),
            fingerprint,
            size,
            creation_date: OnceCell::new(),
        })
    }

    /// Sniff `path` and open it if it is a photo or video.
    ///
    /// Returns `Ok(None)` for anything else; such files are never
    /// fingerprinted.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Option<Self>, AnalyzeError> {
        let path = path.into();
        match mime::detect_kind(&path)? {
            Some((kind, mime)) => Self::open(path, kind, mime).map(Some),
            None => Ok(None),
        }
    }

    /// Source path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Photo or video.
    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Sniffed MIME type.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Content fingerprint taken at construction.
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Size in bytes at construction.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// The creation date, resolved on first access and memoized.
    pub fn creation_date<R>(&self, resolver: &R) -> Option<&CreationDate>
    where
        R: TemporalResolver + ?Sized,
    {
        self.creation_date
            .get_or_init(|| resolver.resolve_creation_time(self))
            .as_ref()
    }

    /// Check whether the content at `path` hashes to this file's fingerprint.
    pub fn matches(&self, path: impl AsRef<Path>) -> Result<bool, AnalyzeError> {
        Ok(fingerprint(path)? == self.fingerprint)
    }
}
