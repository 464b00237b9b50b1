//! Component discovery
//!
//! Types register themselves at link time (`#[derive(Component)]`,
//! [`capability!`](crate::capability)). A [`ComponentScanner`] enumerates the
//! registry plus any manifest directories, resolves candidate names through a
//! [`TypeLoader`] and memoizes the result per namespace. [`filter`] narrows a
//! scan to the concrete providers of one capability.

mod capability;
mod classpath;
mod error;
mod filter;
mod loader;
mod registry;
mod scanner;

#[cfg(test)]
pub(crate) mod fixtures;

pub use classpath::{ClassPath, EMBEDDED_ROOT, ScanRoot, StandardClassPath, under_prefix};
pub use error::DiscoveryError;
pub use filter::{filter, is_impl_type};
pub use loader::{RegistryLoader, TypeLoader};
pub use registry::{
    AnyInstance, AnyObject, Capability, CapabilityBinding, CapabilityOf, CastFn,
    ComponentRegistration, Constructor, TypeHandle, TypeKind, Upcast, UpcastFn, no_cast,
    registrations,
};
pub use scanner::{ComponentScanner, TypeSet};
