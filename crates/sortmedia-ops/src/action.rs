//! Single-file transfer into a resolved target.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use sortmedia_analyze::MediaFile;
use sortmedia_core::TransferMode;

use crate::TransferError;

/// Put `file` at `target`.
///
/// `None` means identical content is already placed: nothing is touched and
/// `false` is returned. Otherwise missing parent directories are created,
/// the file is moved or copied, and `true` is returned.
pub fn apply(
    file: &MediaFile,
    target: Option<&Path>,
    mode: TransferMode,
) -> Result<bool, TransferError> {
    let Some(target) = target else {
        return Ok(false);
    };

    transfer_file(file.path(), target, mode)?;
    Ok(true)
}

/// Move or copy one regular file, creating `target`'s parent directories.
///
/// Returns the number of bytes written to `target`.
pub fn transfer_file(
    source: &Path,
    target: &Path,
    mode: TransferMode,
) -> Result<u64, TransferError> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| TransferError::directory(parent, e))?;
    }

    match mode {
        TransferMode::Copy => fs::copy(source, target).map_err(|e| TransferError::Copy {
            from: source.to_path_buf(),
            to: target.to_path_buf(),
            source: e,
        }),
        TransferMode::Move => move_file(source, target),
    }
}

/// Rename when possible, otherwise copy then remove the source.
fn move_file(source: &Path, target: &Path) -> Result<u64, TransferError> {
    let move_error = |e: io::Error| TransferError::Move {
        from: source.to_path_buf(),
        to: target.to_path_buf(),
        source: e,
    };

    let size = fs::metadata(source).map_err(move_error)?.len();

    match fs::rename(source, target) {
        Ok(()) => return Ok(size),
        Err(e) if is_cross_device(&e) => {
            debug!(from = %source.display(), to = %target.display(), "cross-device move, copying");
        }
        Err(e) => return Err(move_error(e)),
    }

    let copied = fs::copy(source, target).map_err(move_error)?;
    fs::remove_file(source).map_err(move_error)?;
    Ok(copied)
}

// EXDEV is 18 on Linux and macOS
fn is_cross_device(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::CrossesDevices || (cfg!(unix) && e.raw_os_error() == Some(18))
}
