//! Enumeration of the roots a namespace scan walks

use super::registry::registrations;
use crate::constants::COMPONENT_PATH_VAR;
use std::path::{Path, PathBuf};

/// Name of the root backed by the link-time registry
pub const EMBEDDED_ROOT: &str = "embedded";

/// One place component units can be found under
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanRoot {
    /// Filesystem directory already positioned at the requested prefix
    Directory { path: PathBuf },
    /// Flat listing of `/`-separated entry names, unfiltered
    Archive { name: String, entries: Vec<String> },
}

/// Enumerates every root that exposes a path prefix.
///
/// `path_prefix` is a namespace with `::` replaced by `/`, empty for the root.
pub trait ClassPath: Send + Sync {
    fn roots(&self, path_prefix: &str) -> Vec<ScanRoot>;
}

/// Registry archive plus any manifest directories configured for the process
#[derive(Debug, Clone)]
pub struct StandardClassPath {
    embedded: bool,
    directories: Vec<PathBuf>,
}

impl Default for StandardClassPath {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardClassPath {
    pub fn new() -> Self {
        Self {
            embedded: true,
            directories: Vec::new(),
        }
    }

    /// Include the directories listed in `BOOTKIT_COMPONENT_PATH`
    pub fn from_env() -> Self {
        let directories = std::env::var_os(COMPONENT_PATH_VAR)
            .map(|value| std::env::split_paths(&value).collect())
            .unwrap_or_default();
        Self {
            embedded: true,
            directories,
        }
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directories.push(directory.into());
        self
    }

    pub fn without_embedded(mut self) -> Self {
        self.embedded = false;
        self
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    fn embedded_root(&self, path_prefix: &str) -> Option<ScanRoot> {
        let entries: Vec<String> = registrations().map(|r| r.resource_path()).collect();
        let exposed = entries
            .iter()
            .any(|entry| under_prefix(entry.trim_start_matches('/'), path_prefix));
        exposed.then(|| ScanRoot::Archive {
            name: EMBEDDED_ROOT.to_string(),
            entries,
        })
    }
}

impl ClassPath for StandardClassPath {
    fn roots(&self, path_prefix: &str) -> Vec<ScanRoot> {
        let mut roots = Vec::new();

        if self.embedded {
            roots.extend(self.embedded_root(path_prefix));
        }

        for directory in &self.directories {
            let path = positioned(directory, path_prefix);
            if path.is_dir() {
                roots.push(ScanRoot::Directory { path });
            } else {
                tracing::trace!(
                    "Component directory {} does not expose '{}'",
                    directory.display(),
                    path_prefix
                );
            }
        }

        roots
    }
}

fn positioned(directory: &Path, path_prefix: &str) -> PathBuf {
    if path_prefix.is_empty() {
        directory.to_path_buf()
    } else {
        directory.join(path_prefix)
    }
}

/// Whether `entry` lies under `path_prefix`, respecting segment boundaries
pub fn under_prefix(entry: &str, path_prefix: &str) -> bool {
    path_prefix.is_empty()
        || entry == path_prefix
        || entry
            .strip_prefix(path_prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_under_prefix_respects_boundaries() {
        assert!(under_prefix("app/jobs/Warm.component", ""));
        assert!(under_prefix("app/jobs/Warm.component", "app/jobs"));
        assert!(under_prefix("app/jobs", "app/jobs"));
        assert!(!under_prefix("app/jobsextra/Warm.component", "app/jobs"));
        assert!(!under_prefix("other/Warm.component", "app"));
    }

    #[test]
    fn test_embedded_root_only_when_prefix_exposed() {
        let class_path = StandardClassPath::new();

        let roots = class_path.roots("bootkit/scan/fixtures");
        assert_eq!(roots.len(), 1);
        match &roots[0] {
            ScanRoot::Archive { name, entries } => {
                assert_eq!(name, EMBEDDED_ROOT);
                assert!(entries.contains(&"bootkit/scan/fixtures/English.component".to_string()));
            }
            other => panic!("unexpected root {other:?}"),
        }

        assert!(class_path.roots("no/such/namespace").is_empty());
    }

    #[test]
    fn test_directory_roots_are_positioned_at_prefix() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("acme/jobs")).unwrap();

        let class_path = StandardClassPath::new()
            .without_embedded()
            .with_directory(temp.path())
            .with_directory(temp.path().join("missing"));

        assert_eq!(
            class_path.roots("acme/jobs"),
            vec![ScanRoot::Directory {
                path: temp.path().join("acme/jobs")
            }]
        );
        assert_eq!(
            class_path.roots(""),
            vec![ScanRoot::Directory {
                path: temp.path().to_path_buf()
            }]
        );
        assert!(class_path.roots("acme/web").is_empty());
    }
}
