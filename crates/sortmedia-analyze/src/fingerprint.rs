//! Full-content BLAKE3 fingerprinting.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use blake3::Hasher;

use sortmedia_core::Fingerprint;

use crate::AnalyzeError;

/// Files above this size are hashed through a memory map.
const MMAP_THRESHOLD: u64 = 128 * 1024;

/// Compute the BLAKE3 digest of the entire content of `path`.
///
/// The file handle lives only for the duration of this call. Filesystem
/// metadata (name, timestamps, permissions) does not contribute.
pub fn fingerprint(path: impl AsRef<Path>) -> Result<Fingerprint, AnalyzeError> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| AnalyzeError::read(path, e))?;
    let file_size = file
        .metadata()
        .map_err(|e| AnalyzeError::read(path, e))?
        .len();

    let mut hasher = Hasher::new();

    if file_size > MMAP_THRESHOLD {
        drop(file);
        hasher
            .update_mmap(path)
            .map_err(|e| AnalyzeError::read(path, e))?;
    } else {
        let mut buffer = vec![0u8; 64 * 1024];
        loop {
            let bytes_read = file
                .read(&mut buffer)
                .map_err(|e| AnalyzeError::read(path, e))?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }
    }

    Ok(Fingerprint::new(*hasher.finalize().as_bytes()))
}
