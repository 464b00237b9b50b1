use super::PropertySource;
use crate::constants::PROFILES_ACTIVE;
use std::sync::Arc;

/// Ordered stack of property sources.
///
/// Lookups walk the sources front to back and return the first hit, so the
/// first source has the highest precedence. Source names are unique: adding
/// a source replaces any existing source with the same name.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    sources: Vec<Arc<dyn PropertySource>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source with the highest precedence
    pub fn add_first<S: PropertySource + 'static>(&mut self, source: S) -> &mut Self {
        self.remove(source.name());
        self.sources.insert(0, Arc::new(source));
        self
    }

    /// Add a source with the lowest precedence
    pub fn add_last<S: PropertySource + 'static>(&mut self, source: S) -> &mut Self {
        self.remove(source.name());
        self.sources.push(Arc::new(source));
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn PropertySource>> {
        let index = self.sources.iter().position(|s| s.name() == name)?;
        Some(self.sources.remove(index))
    }

    pub fn source(&self, name: &str) -> Option<&Arc<dyn PropertySource>> {
        self.sources.iter().find(|s| s.name() == name)
    }

    pub fn contains_source(&self, name: &str) -> bool {
        self.source(name).is_some()
    }

    /// Source names in precedence order
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn property(&self, key: &str) -> Option<String> {
        self.sources.iter().find_map(|source| source.get(key))
    }

    pub fn property_or(&self, key: &str, default: &str) -> String {
        self.property(key).unwrap_or_else(|| default.to_string())
    }

    /// Explicitly activated profile labels, comma separated in configuration
    pub fn active_profiles(&self) -> Vec<String> {
        self.property(PROFILES_ACTIVE)
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|label| !label.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}
