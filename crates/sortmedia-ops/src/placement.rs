//! Target selection: the write-check and the suffix search.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;

use sortmedia_analyze::{AnalyzeError, MediaFile, TemporalResolver};
use sortmedia_core::{PlacementOutcome, DEFAULT_UNKNOWN_BUCKET};

use crate::TransferError;

/// Classify what currently occupies `candidate` relative to `file`.
///
/// Nothing is written. Only a regular file can be identical; a directory or
/// symlink at the candidate path is always conflicting.
pub fn write_check(file: &MediaFile, candidate: &Path) -> Result<PlacementOutcome, TransferError> {
    let metadata = match fs::symlink_metadata(candidate) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(PlacementOutcome::Empty),
        Err(e) => return Err(AnalyzeError::read(candidate, e).into()),
    };

    if !metadata.is_file() {
        return Ok(PlacementOutcome::Conflicting);
    }

    if file.matches(candidate)? {
        Ok(PlacementOutcome::Identical)
    } else {
        Ok(PlacementOutcome::Conflicting)
    }
}

/// Build the `index`-th candidate for `source` inside `prefix`.
///
/// Index 0 is the unsuffixed name. Later indices append `_<index>` to the
/// stem; the extension is carried over untouched.
pub fn candidate_path(prefix: &Path, source: &Path, index: u64) -> Option<PathBuf> {
    let stem = source.file_stem()?;
    if index == 0 {
        return Some(prefix.join(source.file_name()?));
    }

    let mut name = OsString::from(stem);
    name.push(format!("_{index}"));
    if let Some(ext) = source.extension() {
        name.push(".");
        name.push(ext);
    }
    Some(prefix.join(name))
}

/// Chooses a safe target path for media files under one destination root.
pub struct PlacementResolver<'a, R: ?Sized> {
    destination: &'a Path,
    resolver: &'a R,
    unknown_bucket: &'a str,
}

impl<'a, R> PlacementResolver<'a, R>
where
    R: TemporalResolver + ?Sized,
{
    /// Place files under `destination`, dating them with `resolver`.
    pub fn new(destination: &'a Path, resolver: &'a R) -> Self {
        Self {
            destination,
            resolver,
            unknown_bucket: DEFAULT_UNKNOWN_BUCKET,
        }
    }

    /// Use a different directory name for files without a date.
    pub fn with_unknown_bucket(mut self, bucket: &'a str) -> Self {
        self.unknown_bucket = bucket;
        self
    }

    /// `<root>/<year>/<month>/<day>` when the date resolves, otherwise
    /// `<root>/<unknown bucket>`.
    pub fn date_prefix(&self, file: &MediaFile) -> PathBuf {
        match file.creation_date(self.resolver) {
            Some(date) => date
                .components()
                .iter()
                .fold(self.destination.to_path_buf(), |acc, part| acc.join(part)),
            None => self.destination.join(self.unknown_bucket),
        }
    }

    /// Find where `file` should go.
    ///
    /// Returns `Ok(None)` when identical content already sits at one of the
    /// candidates, so no transfer is needed. Candidates are tried in
    /// increasing suffix order and the first empty one wins.
    ///
    /// The check and the later write are not atomic; a concurrent writer can
    /// claim the returned slot in between.
    pub fn resolve_target(&self, file: &MediaFile) -> Result<Option<PathBuf>, TransferError> {
        let prefix = self.date_prefix(file);

        let mut index = 0u64;
        loop {
            let candidate = candidate_path(&prefix, file.path(), index).ok_or_else(|| {
                TransferError::NoFileName {
                    path: file.path().to_path_buf(),
                }
            })?;

            match write_check(file, &candidate)? {
                PlacementOutcome::Empty => return Ok(Some(candidate)),
                PlacementOutcome::Identical => {
                    trace!(candidate = %candidate.display(), "identical content present");
                    return Ok(None);
                }
                PlacementOutcome::Conflicting => {
                    trace!(candidate = %candidate.display(), "name taken");
                    index += 1;
                }
            }
        }
    }
}
