//! Run orchestration over a source tree.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use jwalk::{Parallelism, WalkDir};
use tracing::{debug, info, trace, warn};

use sortmedia_analyze::{MediaFile, MetadataResolver, TemporalResolver};
use sortmedia_core::{
    normalize_path, FileFailure, PathClass, PolicyClassifier, RunReport, RunStatistics,
    SortConfig, SortError, TransferMode,
};
use sortmedia_ops::{apply, subtree_target, transfer_subtree, PlacementResolver, TransferError};

use crate::RunPhase;

/// Sorts photos and videos from a source tree into a dated destination
/// layout.
///
/// Each call to [`run`](Self::run) is independent: the directory policy,
/// counters and failure list all live inside that call.
pub struct MediaSorter<R = MetadataResolver> {
    resolver: R,
}

impl MediaSorter {
    /// Create a sorter that reads dates from EXIF and `ffprobe`.
    pub fn new() -> Self {
        Self {
            resolver: MetadataResolver::new(),
        }
    }
}

impl Default for MediaSorter {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: TemporalResolver> MediaSorter<R> {
    /// Create a sorter that dates files with `resolver`.
    pub fn with_resolver(resolver: R) -> Self {
        Self { resolver }
    }

    /// Sort `config.source` into `config.destination`.
    ///
    /// Fails only if the source root is unusable. Anything that goes wrong
    /// afterwards is logged, recorded in the report and skipped.
    pub fn run(&self, config: &SortConfig) -> Result<RunReport, SortError> {
        let start = Instant::now();

        let mut run = Run::initialize(config, &self.resolver)?;
        run.process_no_process_roots();
        run.walk_tree();

        Ok(run.finalize(start))
    }
}

/// State of one run.
struct Run<'a, R> {
    config: &'a SortConfig,
    resolver: &'a R,
    phase: RunPhase,
    source: PathBuf,
    destination: PathBuf,
    classifier: PolicyClassifier,
    pruner: WalkPruner,
    stats: RunStatistics,
    failures: Vec<FileFailure>,
}

/// Decides which paths the walk leaves alone: exclude roots, no-process
/// roots and a destination nested in the source.
#[derive(Debug, Clone)]
struct WalkPruner {
    classifier: PolicyClassifier,
    source: PathBuf,
    nested_destination: Option<PathBuf>,
}

impl WalkPruner {
    fn new(classifier: &PolicyClassifier, source: &Path, destination: &Path) -> Self {
        Self {
            classifier: classifier.clone(),
            source: source.to_path_buf(),
            nested_destination: destination
                .starts_with(source)
                .then(|| destination.to_path_buf()),
        }
    }

    fn in_destination(&self, path: &Path) -> bool {
        self.nested_destination
            .as_deref()
            .is_some_and(|destination| path.starts_with(destination))
    }

    fn prunes(&self, path: &Path) -> bool {
        self.in_destination(path) || self.classifier.classify(path) != PathClass::Normal
    }

    /// A followed link is also judged by where it really points. Links that
    /// leave the source tree or cannot be resolved are pruned.
    fn prunes_entry(&self, path: &Path, is_link: bool) -> bool {
        if self.prunes(path) {
            return true;
        }
        if !is_link {
            return false;
        }
        match path.canonicalize() {
            Ok(real) => !real.starts_with(&self.source) || self.prunes(&real),
            Err(_) => true,
        }
    }
}

/// A walked entry, collected before any file is touched.
struct WalkEntry {
    path: PathBuf,
    file_type: fs::FileType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Directory,
    File,
    /// Followed link whose target is a regular file.
    Link,
    Other,
}

impl<'a, R: TemporalResolver> Run<'a, R> {
    fn initialize(config: &'a SortConfig, resolver: &'a R) -> Result<Self, SortError> {
        debug!(phase = %RunPhase::Initializing, "entering phase");

        let source = config
            .source
            .canonicalize()
            .map_err(|e| SortError::io(&config.source, e))?;
        if !source.is_dir() {
            return Err(SortError::NotADirectory { path: source });
        }

        let destination = resolve_destination(&config.destination)?;
        if destination == source {
            return Err(SortError::invalid_config(
                "destination must differ from the source directory",
            ));
        }
        if destination.exists() && !destination.is_dir() {
            return Err(SortError::invalid_config(format!(
                "destination is not a directory: {}",
                destination.display()
            )));
        }

        let classifier = PolicyClassifier::new(&config.policy, &source);
        if let Some(root) = classifier
            .no_process_roots()
            .iter()
            .find(|root| root.exists() && !root.is_dir())
        {
            return Err(SortError::invalid_config(format!(
                "no-process entry is not a directory: {}",
                root.display()
            )));
        }

        let pruner = WalkPruner::new(&classifier, &source, &destination);
        debug!(
            source = %source.display(),
            destination = %destination.display(),
            excludes = ?classifier.exclude_roots(),
            no_process = ?classifier.no_process_roots(),
            "policy resolved"
        );

        Ok(Self {
            config,
            resolver,
            phase: RunPhase::Initializing,
            source,
            destination,
            classifier,
            pruner,
            stats: RunStatistics::new(),
            failures: Vec::new(),
        })
    }

    fn enter(&mut self, phase: RunPhase) {
        debug!(from = %self.phase, to = %phase, "entering phase");
        self.phase = phase;
    }

    /// Transfer each no-process root as a unit, before the walk starts.
    fn process_no_process_roots(&mut self) {
        self.enter(RunPhase::ProcessingNoProcessRoots);

        let roots = self.classifier.no_process_roots().to_vec();
        for root in roots {
            if self.classifier.is_excluded(&root) {
                warn!(root = %root.display(), "no-process root lies under an exclude root, skipping");
                continue;
            }

            if self.config.dry_run {
                match subtree_target(&root, &self.source, &self.destination) {
                    Some(target) => {
                        info!("{} -> {} (no-process, dry run)", root.display(), target.display())
                    }
                    None => info!("{} (no-process, dry run)", root.display()),
                }
                self.stats.record_no_process_root();
                continue;
            }

            match transfer_subtree(&root, &self.source, &self.destination, self.config.mode) {
                Ok(transfer) => {
                    info!(
                        "{} -> {} (no-process)",
                        transfer.root.display(),
                        transfer.target.display()
                    );
                    self.stats.record_no_process_root();
                }
                Err(e) => self.fail(&root, &e),
            }
        }
    }

    /// Walk the source tree and place every photo and video found.
    fn walk_tree(&mut self) {
        self.enter(RunPhase::WalkingTree);

        let entries = self.collect_entries();
        debug!(entries = entries.len(), "source tree collected");

        for entry in entries {
            self.visit(entry);
        }
    }

    /// Collect all entries first, so files placed during the walk are never
    /// seen by it.
    ///
    /// Pruned directories are still listed but never read.
    fn collect_entries(&mut self) -> Vec<WalkEntry> {
        let pruner = self.pruner.clone();
        let walker = WalkDir::new(&self.source)
            .parallelism(Parallelism::Serial)
            .sort(true)
            .skip_hidden(false)
            .follow_links(self.config.follow_symlinks)
            .min_depth(1)
            .process_read_dir(move |_depth, _path, _state, children| {
                children.retain(|child| match child {
                    Ok(_) => true,
                    Err(err) => !err.path().is_some_and(|path| pruner.prunes(path)),
                });
                for child in children.iter_mut().flatten() {
                    if child.file_type.is_dir()
                        && pruner.prunes_entry(&child.path(), child.path_is_symlink())
                    {
                        child.read_children_path = None;
                    }
                }
            });

        let mut entries = Vec::new();
        for entry_result in walker {
            match entry_result {
                Ok(entry) => entries.push(WalkEntry {
                    path: entry.path(),
                    file_type: entry.file_type(),
                }),
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.source.clone());
                    self.fail(&path, &err);
                }
            }
        }
        entries
    }

    fn visit(&mut self, entry: WalkEntry) {
        let kind = entry_kind(&entry, self.config.follow_symlinks);
        if kind == EntryKind::Directory {
            if self.classifier.is_excluded(&entry.path) {
                debug!(path = %entry.path.display(), "excluded directory");
                self.stats.record_excluded();
            }
            return;
        }

        if !self.admit(&entry.path) {
            return;
        }
        if kind == EntryKind::Other {
            debug!(path = %entry.path.display(), "not a regular file, skipped");
            self.stats.record_skipped();
            return;
        }

        // Through a followed link the real file may sit anywhere.
        if self.config.follow_symlinks {
            let real = match entry.path.canonicalize() {
                Ok(real) => real,
                Err(e) => return self.fail(&entry.path, &e),
            };
            if real != entry.path {
                if !real.starts_with(&self.source) {
                    debug!(
                        path = %entry.path.display(),
                        target = %real.display(),
                        "link leads outside the source tree, skipped"
                    );
                    self.stats.record_skipped();
                    return;
                }
                if !self.admit(&real) {
                    return;
                }
            }
        }

        let path = entry.path;
        let file = match MediaFile::from_path(&path) {
            Ok(Some(file)) => file,
            Ok(None) => {
                trace!(path = %path.display(), "not a photo or video");
                return;
            }
            Err(e) => return self.fail(&path, &e),
        };
        self.stats.record_media(file.kind());

        if self.config.dry_run {
            info!("{} ({}, dry run)", path.display(), file.kind());
            return;
        }

        // A link is copied under its own name; moving it would only move
        // the link. In move mode the link is removed once placed.
        let is_link = kind == EntryKind::Link;
        let mode = if is_link {
            TransferMode::Copy
        } else {
            self.config.mode
        };

        match self.place(&file, mode) {
            Ok(Some(target)) => {
                self.stats.record_transfer(file.size());
                info!("{} -> {}", path.display(), target.display());
                if is_link && !self.config.is_copy() {
                    if let Err(e) = fs::remove_file(&path) {
                        self.fail(&path, &e);
                    }
                }
            }
            Ok(None) => {
                self.stats.record_duplicate();
                info!("{} -- DUPLICATE", path.display());
            }
            Err(e) => self.fail(&path, &e),
        }
    }

    /// Apply the directory policy to `path`, counting exclusions.
    fn admit(&mut self, path: &Path) -> bool {
        if self.pruner.in_destination(path) {
            trace!(path = %path.display(), "inside destination, pruned");
            return false;
        }

        match self.classifier.classify(path) {
            PathClass::Excluded => {
                debug!(path = %path.display(), "excluded");
                self.stats.record_excluded();
                false
            }
            PathClass::NoProcess => {
                trace!(path = %path.display(), "under a no-process root");
                false
            }
            PathClass::Normal => true,
        }
    }

    /// Resolve a target for `file` and transfer it there.
    ///
    /// Returns the target, or `None` when identical content was already
    /// placed and nothing was transferred.
    fn place(&self, file: &MediaFile, mode: TransferMode) -> Result<Option<PathBuf>, TransferError> {
        let target = PlacementResolver::new(&self.destination, self.resolver)
            .with_unknown_bucket(&self.config.unknown_bucket)
            .resolve_target(file)?;

        if apply(file, target.as_deref(), mode)? {
            Ok(target)
        } else {
            Ok(None)
        }
    }

    fn fail(&mut self, path: &Path, error: &dyn std::fmt::Display) {
        warn!(path = %path.display(), "{error}");
        self.stats.record_failure();
        self.failures.push(FileFailure::new(path, error.to_string()));
    }

    fn finalize(mut self, start: Instant) -> RunReport {
        self.enter(RunPhase::Finalizing);

        let stats = &self.stats;
        let dry = if self.config.dry_run { " (dry run)" } else { "" };
        info!(
            "Processed {} files: {} photos, {} videos{dry}",
            stats.total_processed(),
            stats.photos,
            stats.videos
        );
        info!("Skipped {} duplicates", stats.duplicates);
        info!("Excluded {} paths", stats.excluded);
        if stats.skipped > 0 {
            info!("Skipped {} links and special files", stats.skipped);
        }
        if stats.no_process_roots > 0 {
            info!("Transferred {} no-process directories", stats.no_process_roots);
        }
        info!(
            "Transferred {}",
            humansize::format_size(stats.bytes_transferred, humansize::BINARY)
        );
        if stats.failed > 0 {
            warn!("{} failures", stats.failed);
        }

        RunReport {
            stats: self.stats,
            failures: self.failures,
            dry_run: self.config.dry_run,
            duration: start.elapsed(),
        }
    }
}

fn entry_kind(entry: &WalkEntry, follow_symlinks: bool) -> EntryKind {
    let is_link = entry.file_type.is_symlink()
        || fs::symlink_metadata(&entry.path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false);

    if is_link {
        if !follow_symlinks {
            return EntryKind::Other;
        }
        return match fs::metadata(&entry.path) {
            Ok(m) if m.is_dir() => EntryKind::Directory,
            Ok(m) if m.is_file() => EntryKind::Link,
            _ => EntryKind::Other,
        };
    }

    if entry.file_type.is_dir() {
        EntryKind::Directory
    } else if entry.file_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    }
}

/// Make the destination absolute and resolve symlinks in its longest
/// existing prefix, so it compares equal to walked paths.
fn resolve_destination(destination: &Path) -> Result<PathBuf, SortError> {
    let absolute =
        std::path::absolute(destination).map_err(|e| SortError::io(destination, e))?;
    let normalized = normalize_path(&absolute);

    let mut existing = normalized.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return Ok(missing
                .iter()
                .rev()
                .fold(canonical, |acc: PathBuf, name| acc.join(name)));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name);
                existing = parent;
            }
            _ => return Ok(normalized),
        }
    }
}
