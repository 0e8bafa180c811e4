//! Directory policy: exclude roots and no-process roots.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Operator-supplied directory lists for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryPolicy {
    /// Subtrees never visited or transferred.
    #[serde(default)]
    pub excludes: Vec<PathBuf>,
    /// Subtrees transferred wholesale, without per-file placement.
    #[serde(default, alias = "noprocess")]
    pub no_process: Vec<PathBuf>,
}

impl DirectoryPolicy {
    /// Create a policy from exclude and no-process lists.
    pub fn new(excludes: Vec<PathBuf>, no_process: Vec<PathBuf>) -> Self {
        Self {
            excludes,
            no_process,
        }
    }

    /// Check if neither list has entries.
    pub fn is_empty(&self) -> bool {
        self.excludes.is_empty() && self.no_process.is_empty()
    }

    /// Append another policy's entries to this one.
    pub fn extend(&mut self, other: DirectoryPolicy) {
        self.excludes.extend(other.excludes);
        self.no_process.extend(other.no_process);
    }
}

/// How a path is treated by the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// Regular placement candidate.
    Normal,
    /// Under an exclude root.
    Excluded,
    /// Under a no-process root; handled by the bulk transfer pass.
    NoProcess,
}

/// Classifies paths against a [`DirectoryPolicy`] resolved for one source
/// root.
///
/// Relative policy entries are anchored at the source root. All roots are
/// normalized so that classification is a plain component-wise ancestor
/// check.
#[derive(Debug, Clone)]
pub struct PolicyClassifier {
    excludes: Vec<PathBuf>,
    no_process: Vec<PathBuf>,
}

impl PolicyClassifier {
    /// Resolve `policy` against `source_root`.
    pub fn new(policy: &DirectoryPolicy, source_root: &Path) -> Self {
        let mut excludes: Vec<PathBuf> = policy
            .excludes
            .iter()
            .map(|entry| resolve_root(entry, source_root))
            .collect();
        excludes.sort();
        excludes.dedup();

        let mut no_process: Vec<PathBuf> = Vec::with_capacity(policy.no_process.len());
        for root in policy.no_process.iter().map(|e| resolve_root(e, source_root)) {
            if !no_process.contains(&root) {
                no_process.push(root);
            }
        }

        Self {
            excludes,
            no_process,
        }
    }

    /// Classify a path. Exclusion wins over no-process.
    pub fn classify(&self, path: &Path) -> PathClass {
        let path = normalize_path(path);
        if self.is_under(&self.excludes, &path) {
            PathClass::Excluded
        } else if self.is_under(&self.no_process, &path) {
            PathClass::NoProcess
        } else {
            PathClass::Normal
        }
    }

    /// Check if `path` equals or descends from an exclude root.
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.is_under(&self.excludes, &normalize_path(path))
    }

    /// Resolved exclude roots.
    pub fn exclude_roots(&self) -> &[PathBuf] {
        &self.excludes
    }

    /// Resolved no-process roots, in configuration order.
    pub fn no_process_roots(&self) -> &[PathBuf] {
        &self.no_process
    }

    fn is_under(&self, roots: &[PathBuf], path: &Path) -> bool {
        roots.iter().any(|root| path.starts_with(root))
    }
}

/// Anchor a configured entry at the source root, normalize it and, when it
/// exists, canonicalize it.
fn resolve_root(entry: &Path, source_root: &Path) -> PathBuf {
    let joined = if entry.is_absolute() {
        entry.to_path_buf()
    } else {
        source_root.join(entry)
    };
    let normalized = normalize_path(&joined);
    normalized.canonicalize().unwrap_or(normalized)
}

/// Lexically remove `.` and `..` components without touching the
/// filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(excludes: &[&str], no_process: &[&str]) -> PolicyClassifier {
        let policy = DirectoryPolicy::new(
            excludes.iter().map(PathBuf::from).collect(),
            no_process.iter().map(PathBuf::from).collect(),
        );
        PolicyClassifier::new(&policy, Path::new("/nonexistent/src"))
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize_path(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize_path(Path::new("a/../../b")), PathBuf::from("../b"));
        assert_eq!(normalize_path(Path::new("./a/")), PathBuf::from("a"));
    }

    #[test]
    fn test_relative_entries_anchor_at_source() {
        let c = classifier(&["private"], &["vacation"]);
        assert_eq!(c.exclude_roots(), &[PathBuf::from("/nonexistent/src/private")]);
        assert_eq!(c.no_process_roots(), &[PathBuf::from("/nonexistent/src/vacation")]);
    }

    #[test]
    fn test_classify() {
        let c = classifier(&["private"], &["/nonexistent/src/vacation"]);

        assert_eq!(c.classify(Path::new("/nonexistent/src/a.jpg")), PathClass::Normal);
        assert_eq!(
            c.classify(Path::new("/nonexistent/src/private")),
            PathClass::Excluded
        );
        assert_eq!(
            c.classify(Path::new("/nonexistent/src/private/deep/a.jpg")),
            PathClass::Excluded
        );
        assert_eq!(
            c.classify(Path::new("/nonexistent/src/vacation/a.jpg")),
            PathClass::NoProcess
        );
        assert_eq!(
            c.classify(Path::new("/nonexistent/src/other/../private/a.jpg")),
            PathClass::Excluded
        );
    }

    #[test]
    fn test_classify_is_component_wise() {
        let c = classifier(&["vacation"], &[]);
        assert_eq!(
            c.classify(Path::new("/nonexistent/src/vacation2/a.jpg")),
            PathClass::Normal
        );
        assert!(!c.is_excluded(Path::new("/nonexistent/src/vacation.jpg")));
    }

    #[test]
    fn test_exclude_wins_over_no_process() {
        let c = classifier(&["trips"], &["trips/2019"]);
        assert_eq!(
            c.classify(Path::new("/nonexistent/src/trips/2019/a.jpg")),
            PathClass::Excluded
        );
    }

    #[test]
    fn test_duplicate_roots_collapse() {
        let c = classifier(&["x", "./x", "y/../x"], &["v", "v/"]);
        assert_eq!(c.exclude_roots().len(), 1);
        assert_eq!(c.no_process_roots().len(), 1);
    }

    #[test]
    fn test_policy_extend() {
        let mut policy = DirectoryPolicy::default();
        assert!(policy.is_empty());
        policy.extend(DirectoryPolicy::new(vec!["a".into()], vec!["b".into()]));
        assert_eq!(policy.excludes, vec![PathBuf::from("a")]);
        assert_eq!(policy.no_process, vec![PathBuf::from("b")]);
        assert!(!policy.is_empty());
    }
}
