//! Content-based MIME detection.

use std::path::Path;

use file_format::FileFormat;

use sortmedia_core::MediaKind;

use crate::AnalyzeError;

/// Sniff the MIME type of `path` from its content.
///
/// MP4 and Matroska containers are inspected past the signature, so a file
/// with a video track reports `video/*` rather than a generic container
/// type.
pub fn detect(path: impl AsRef<Path>) -> Result<String, AnalyzeError> {
    let path = path.as_ref();
    FileFormat::from_file(path)
        .map(|format| format.media_type().to_owned())
        .map_err(|e| AnalyzeError::read(path, e))
}

/// Sniff `path` and map it to a media kind, if it is one.
pub fn detect_kind(path: impl AsRef<Path>) -> Result<Option<(MediaKind, String)>, AnalyzeError> {
    let mime = detect(path)?;
    Ok(MediaKind::from_mime(&mime).map(|kind| (kind, mime)))
}
