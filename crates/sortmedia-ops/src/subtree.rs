//! Wholesale transfer of no-process directories.

use std::fs;
use std::path::{Path, PathBuf};

use fs_extra::dir::{self, CopyOptions};
use tracing::debug;

use sortmedia_core::TransferMode;

use crate::TransferError;

/// Outcome of one subtree transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtreeTransfer {
    /// Directory that was transferred.
    pub root: PathBuf,
    /// Where it now lives.
    pub target: PathBuf,
    /// Bytes copied or moved.
    pub bytes: u64,
}

/// Where a no-process `root` lands under `destination`.
///
/// A root inside `source_root` keeps its relative path; any other root is
/// placed directly under `destination` by name.
pub fn subtree_target(root: &Path, source_root: &Path, destination: &Path) -> Option<PathBuf> {
    match root.strip_prefix(source_root) {
        Ok(relative) if !relative.as_os_str().is_empty() => Some(destination.join(relative)),
        _ => root.file_name().map(|name| destination.join(name)),
    }
}

/// Move or copy the whole directory `root` to its place under `destination`.
///
/// Nothing inside is fingerprinted or renamed. The target must not exist
/// yet; merging into an existing directory is refused.
pub fn transfer_subtree(
    root: &Path,
    source_root: &Path,
    destination: &Path,
    mode: TransferMode,
) -> Result<SubtreeTransfer, TransferError> {
    if !root.is_dir() {
        return Err(TransferError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let target = subtree_target(root, source_root, destination).ok_or_else(|| {
        TransferError::NoFileName {
            path: root.to_path_buf(),
        }
    })?;

    if target.starts_with(root) {
        return Err(TransferError::SourceIsAncestor {
            root: root.to_path_buf(),
            target,
        });
    }

    if fs::symlink_metadata(&target).is_ok() {
        return Err(TransferError::DestinationExists { path: target });
    }

    // fs_extra places the directory inside `parent` under its own name,
    // which is always the last component of `target`.
    let parent = target
        .parent()
        .ok_or_else(|| TransferError::NoFileName {
            path: target.clone(),
        })?;
    fs::create_dir_all(parent).map_err(|e| TransferError::directory(parent, e))?;

    let options = CopyOptions::new();
    let result = match mode {
        TransferMode::Copy => dir::copy(root, parent, &options),
        TransferMode::Move => dir::move_dir(root, parent, &options),
    };

    let bytes = result.map_err(|e| TransferError::Subtree {
        root: root.to_path_buf(),
        target: target.clone(),
        source: e,
    })?;

    debug!(root = %root.display(), target = %target.display(), bytes, "subtree transferred");

    Ok(SubtreeTransfer {
        root: root.to_path_buf(),
        target,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn vacation(src: &Path) -> PathBuf {
        let root = src.join("vacation");
        fs::create_dir_all(root.join("day1")).unwrap();
        fs::write(root.join("day1/beach.jpg"), b"sand").unwrap();
        fs::write(root.join("notes.txt"), b"sunny").unwrap();
        root
    }

    #[test]
    fn test_subtree_target() {
        let dst = Path::new("/dst");
        assert_eq!(
            subtree_target(Path::new("/src/trips/vacation"), Path::new("/src"), dst),
            Some(PathBuf::from("/dst/trips/vacation"))
        );
        assert_eq!(
            subtree_target(Path::new("/elsewhere/vacation"), Path::new("/src"), dst),
            Some(PathBuf::from("/dst/vacation"))
        );
        assert_eq!(
            subtree_target(Path::new("/src"), Path::new("/src"), dst),
            Some(PathBuf::from("/dst/src"))
        );
    }

    #[test]
    fn test_move_subtree_intact() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let root = vacation(src.path());

        let transfer =
            transfer_subtree(&root, src.path(), dst.path(), TransferMode::Move).unwrap();

        assert_eq!(transfer.target, dst.path().join("vacation"));
        assert!(!root.exists());
        assert_eq!(
            fs::read(dst.path().join("vacation/day1/beach.jpg")).unwrap(),
            b"sand"
        );
        assert_eq!(
            fs::read(dst.path().join("vacation/notes.txt")).unwrap(),
            b"sunny"
        );
    }

    #[test]
    fn test_copy_subtree_keeps_source() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let root = vacation(src.path());

        let transfer =
            transfer_subtree(&root, src.path(), dst.path(), TransferMode::Copy).unwrap();

        assert_eq!(transfer.bytes, 9);
        assert!(root.join("day1/beach.jpg").exists());
        assert!(dst.path().join("vacation/day1/beach.jpg").exists());
    }

    #[test]
    fn test_nested_root_keeps_relative_path() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let trips = src.path().join("trips");
        fs::create_dir(&trips).unwrap();
        let root = vacation(&trips);

        transfer_subtree(&root, src.path(), dst.path(), TransferMode::Move).unwrap();
        assert!(dst.path().join("trips/vacation/notes.txt").exists());
    }

    #[test]
    fn test_existing_target_is_refused() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let root = vacation(src.path());
        fs::create_dir(dst.path().join("vacation")).unwrap();

        let err = transfer_subtree(&root, src.path(), dst.path(), TransferMode::Move).unwrap_err();
        assert!(matches!(err, TransferError::DestinationExists { .. }));
        assert!(root.join("notes.txt").exists());
    }

    #[test]
    fn test_missing_root() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();

        let err = transfer_subtree(
            &src.path().join("nowhere"),
            src.path(),
            dst.path(),
            TransferMode::Copy,
        )
        .unwrap_err();
        assert!(matches!(err, TransferError::NotADirectory { .. }));
    }

    #[test]
    fn test_destination_inside_root() {
        let src = TempDir::new().unwrap();
        let root = vacation(src.path());
        let dst = root.join("sorted");

        let err = transfer_subtree(&root, src.path(), &dst, TransferMode::Copy).unwrap_err();
        assert!(matches!(err, TransferError::SourceIsAncestor { .. }));
    }
}
