use super::MapPropertySource;
use crate::constants::SYSTEM_PROPERTIES_SOURCE;
use dashmap::DashMap;
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<SystemProperties> = OnceLock::new();

/// Mutable process properties
///
/// Layered between the command line and the OS environment. Values set here
/// before startup override environment variables.
#[derive(Clone, Default, Debug)]
pub struct SystemProperties {
    properties: Arc<DashMap<String, String>>,
}

impl SystemProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide property store
    pub fn global() -> &'static SystemProperties {
        GLOBAL.get_or_init(SystemProperties::new)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.properties.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.properties.insert(key.to_string(), value.to_string());
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.properties.remove(key).map(|(_, value)| value)
    }

    /// Freeze the current values into a property source
    pub fn snapshot(&self) -> MapPropertySource {
        MapPropertySource::from_pairs(
            SYSTEM_PROPERTIES_SOURCE,
            self.properties
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().clone())),
        )
    }
}
