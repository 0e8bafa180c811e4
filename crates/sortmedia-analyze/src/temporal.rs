//! Creation-date resolution.

use std::path::Path;

use tracing::debug;

use sortmedia_core::{CreationDate, MediaKind};

use crate::photo::ExifDateSource;
use crate::video::FfprobeDateSource;
use crate::{AnalyzeError, MediaFile};

/// Maps a media file to the calendar date it was created on.
///
/// Implementations return `None` rather than failing when no usable
/// timestamp exists. Memoization is handled by [`MediaFile`], so a resolver
/// may be called at most once per file.
pub trait TemporalResolver {
    /// Resolve the creation date of `file`.
    fn resolve_creation_time(&self, file: &MediaFile) -> Option<CreationDate>;
}

impl<F> TemporalResolver for F
where
    F: Fn(&MediaFile) -> Option<CreationDate>,
{
    fn resolve_creation_time(&self, file: &MediaFile) -> Option<CreationDate> {
        self(file)
    }
}

/// A metadata reader for one media kind.
pub trait DateSource {
    /// Read the creation date stored in the file's metadata.
    ///
    /// `Ok(None)` means the file has no date; `Err` means the metadata could
    /// not be read at all.
    fn read_date(&self, path: &Path) -> Result<Option<CreationDate>, AnalyzeError>;
}

/// Production resolver: EXIF for photos, `ffprobe` for videos.
#[derive(Debug, Clone, Default)]
pub struct MetadataResolver {
    photo: ExifDateSource,
    video: FfprobeDateSource,
}

impl MetadataResolver {
    /// Create a resolver with default sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom video source (e.g. a different `ffprobe` binary).
    pub fn with_video_source(mut self, video: FfprobeDateSource) -> Self {
        self.video = video;
        self
    }

    fn source_for(&self, kind: MediaKind) -> &dyn DateSource {
        match kind {
            MediaKind::Photo => &self.photo,
            MediaKind::Video => &self.video,
        }
    }
}

impl TemporalResolver for MetadataResolver {
    fn resolve_creation_time(&self, file: &MediaFile) -> Option<CreationDate> {
        match self.source_for(file.kind()).read_date(file.path()) {
            Ok(date) => date,
            Err(e) => {
                debug!(path = %file.path().display(), error = %e, "no creation date");
                None
            }
        }
    }
}
