use super::classpath::{ClassPath, ScanRoot, StandardClassPath, under_prefix};
use super::loader::{RegistryLoader, TypeLoader};
use super::registry::TypeHandle;
use crate::constants::{COMPONENT_SUFFIX, NAMESPACE_SEPARATOR};
use dashmap::DashMap;
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use walkdir::WalkDir;

/// Insertion-ordered set of discovered types
#[derive(Debug, Clone, Default)]
pub struct TypeSet {
    order: Vec<TypeHandle>,
    seen: HashSet<TypeHandle>,
}

impl TypeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the type was already present
    pub fn insert(&mut self, handle: TypeHandle) -> bool {
        if !self.seen.insert(handle) {
            return false;
        }
        self.order.push(handle);
        true
    }

    pub fn contains(&self, handle: &TypeHandle) -> bool {
        self.seen.contains(handle)
    }

    pub fn contains_name(&self, qualified_name: &str) -> bool {
        self.order
            .iter()
            .any(|handle| handle.qualified_name() == qualified_name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TypeHandle> {
        self.order.iter()
    }

    pub fn qualified_names(&self) -> Vec<String> {
        self.order.iter().map(TypeHandle::qualified_name).collect()
    }
}

impl PartialEq for TypeSet {
    fn eq(&self, other: &Self) -> bool {
        self.seen == other.seen
    }
}

impl Eq for TypeSet {}

impl FromIterator<TypeHandle> for TypeSet {
    fn from_iter<I: IntoIterator<Item = TypeHandle>>(iter: I) -> Self {
        let mut set = TypeSet::new();
        for handle in iter {
            set.insert(handle);
        }
        set
    }
}

impl<'a> IntoIterator for &'a TypeSet {
    type Item = &'a TypeHandle;
    type IntoIter = std::slice::Iter<'a, TypeHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Discovers every type registered under a namespace.
///
/// Results are memoized per namespace for the lifetime of the scanner. The
/// cache is never invalidated; concurrent first scans of the same namespace
/// may both walk the roots, but only one result is kept.
pub struct ComponentScanner {
    class_path: Arc<dyn ClassPath>,
    loader: Arc<dyn TypeLoader>,
    cache: DashMap<String, Arc<TypeSet>>,
}

impl ComponentScanner {
    pub fn new(class_path: Arc<dyn ClassPath>, loader: Arc<dyn TypeLoader>) -> Self {
        Self {
            class_path,
            loader,
            cache: DashMap::new(),
        }
    }

    /// Process-wide scanner over the registry and `BOOTKIT_COMPONENT_PATH`
    pub fn global() -> &'static ComponentScanner {
        static SCANNER: OnceLock<ComponentScanner> = OnceLock::new();
        SCANNER.get_or_init(|| {
            ComponentScanner::new(
                Arc::new(StandardClassPath::from_env()),
                Arc::new(RegistryLoader),
            )
        })
    }

    pub fn scan(&self, namespace: &str) -> Arc<TypeSet> {
        if let Some(cached) = self.cache.get(namespace) {
            return Arc::clone(cached.value());
        }

        let discovered = Arc::new(self.discover(namespace));
        let entry = self
            .cache
            .entry(namespace.to_string())
            .or_insert(discovered);
        Arc::clone(entry.value())
    }

    pub fn is_cached(&self, namespace: &str) -> bool {
        self.cache.contains_key(namespace)
    }

    fn discover(&self, namespace: &str) -> TypeSet {
        let path_prefix = namespace_to_path(namespace);
        let mut types = TypeSet::new();

        for root in self.class_path.roots(&path_prefix) {
            match root {
                ScanRoot::Directory { path } => self.scan_directory(namespace, &path, &mut types),
                ScanRoot::Archive { name, entries } => {
                    tracing::trace!("Scanning archive root '{}' for '{}'", name, path_prefix);
                    self.scan_archive(&path_prefix, &entries, &mut types)
                }
            }
        }

        tracing::debug!("Discovered {} types under '{}'", types.len(), namespace);
        types
    }

    fn scan_directory(&self, namespace: &str, base: &Path, types: &mut TypeSet) {
        tracing::trace!("Scanning directory root {}", base.display());

        let walker = WalkDir::new(base).follow_links(true).sort_by_file_name();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::trace!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(stem) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.strip_suffix(COMPONENT_SUFFIX))
            else {
                continue;
            };
            let Ok(relative) = entry.path().strip_prefix(base) else {
                continue;
            };

            let mut package: Vec<&str> = namespace
                .split(NAMESPACE_SEPARATOR)
                .filter(|segment| !segment.is_empty())
                .collect();
            let mut utf8 = true;
            if let Some(parent) = relative.parent() {
                for component in parent.components() {
                    match component.as_os_str().to_str() {
                        Some(segment) => package.push(segment),
                        None => utf8 = false,
                    }
                }
            }
            if !utf8 || package.is_empty() {
                continue;
            }

            self.resolve(qualify(&package.join(NAMESPACE_SEPARATOR), stem), types);
        }
    }

    fn scan_archive(&self, path_prefix: &str, entries: &[String], types: &mut TypeSet) {
        for entry in entries {
            let entry = entry.trim_start_matches('/');
            if entry.ends_with('/') || !under_prefix(entry, path_prefix) {
                continue;
            }
            let Some((directory, file)) = entry.rsplit_once('/') else {
                continue;
            };
            let Some(stem) = file.strip_suffix(COMPONENT_SUFFIX) else {
                continue;
            };
            self.resolve(qualify(&directory.replace('/', NAMESPACE_SEPARATOR), stem), types);
        }
    }

    fn resolve(&self, candidate: String, types: &mut TypeSet) {
        match self.loader.load(&candidate) {
            Ok(handle) => {
                types.insert(handle);
            }
            Err(err) => tracing::trace!("Discarding candidate '{}': {}", candidate, err),
        }
    }
}

fn qualify(package: &str, name: &str) -> String {
    format!("{}{}{}", package, NAMESPACE_SEPARATOR, name)
}

fn namespace_to_path(namespace: &str) -> String {
    namespace
        .split(NAMESPACE_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
