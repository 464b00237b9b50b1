use super::registry::{ComponentRegistration, TypeHandle, registrations};
use super::DiscoveryError;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Resolves a fully-qualified type name to a handle
pub trait TypeLoader: Send + Sync {
    fn load(&self, qualified_name: &str) -> Result<TypeHandle, DiscoveryError>;
}

/// Loader backed by the link-time registry
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryLoader;

impl RegistryLoader {
    fn index() -> &'static HashMap<String, &'static ComponentRegistration> {
        static INDEX: OnceLock<HashMap<String, &'static ComponentRegistration>> = OnceLock::new();
        INDEX.get_or_init(|| {
            let mut index = HashMap::new();
            for registration in registrations() {
                index
                    .entry(registration.qualified_name())
                    .or_insert(registration);
            }
            tracing::debug!("Indexed {} registered types", index.len());
            index
        })
    }
}

impl TypeLoader for RegistryLoader {
    fn load(&self, qualified_name: &str) -> Result<TypeHandle, DiscoveryError> {
        Self::index()
            .get(qualified_name)
            .map(|registration| TypeHandle::new(registration))
            .ok_or_else(|| DiscoveryError::unresolvable(qualified_name))
    }
}
