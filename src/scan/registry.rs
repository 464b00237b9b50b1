//! Link-time component registry
//!
//! Every `#[derive(Component)]` type and every `capability!` declaration
//! submits a [`ComponentRegistration`] through `inventory`. The registry is the
//! embedded root the scanner enumerates; nothing is introspected at runtime.

use super::DiscoveryError;
use crate::constants::{COMPONENT_SUFFIX, NAMESPACE_SEPARATOR};
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use strum_macros::Display;

/// Type-erased component instance
pub type AnyInstance = Arc<dyn Any + Send + Sync>;

/// Type-erased capability object, always a `Box<Arc<dyn Capability>>`
pub type AnyObject = Box<dyn Any + Send + Sync>;

pub type Constructor = fn() -> Result<AnyInstance, DiscoveryError>;

/// Turns a concrete instance into a boxed `Arc<dyn Capability>`
pub type CastFn = fn(AnyInstance) -> Option<AnyObject>;

/// Turns a boxed `Arc<dyn Sub>` into a boxed `Arc<dyn Super>`
pub type UpcastFn = fn(AnyObject) -> Option<AnyObject>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum TypeKind {
    Concrete,
    Abstract,
    Interface,
}

/// Descriptor of a capability trait, declared with [`capability!`](crate::capability)
pub struct Capability {
    pub name: &'static str,
    pub id: fn() -> TypeId,
    /// Direct super-capabilities
    pub extends: &'static [Upcast],
}

pub struct Upcast {
    pub target: fn() -> &'static Capability,
    pub cast: UpcastFn,
}

impl Capability {
    pub fn type_id(&self) -> TypeId {
        (self.id)()
    }

    pub fn is(&self, other: &Capability) -> bool {
        self.type_id() == other.type_id()
    }

    /// Whether this capability is `target` or extends it, transitively
    pub fn satisfies(&self, target: &Capability) -> bool {
        self.is(target)
            || self
                .extends
                .iter()
                .any(|upcast| (upcast.target)().satisfies(target))
    }

    fn upcast(&self, object: AnyObject, target: &Capability) -> Option<AnyObject> {
        if self.is(target) {
            return Some(object);
        }
        let step = self
            .extends
            .iter()
            .find(|upcast| (upcast.target)().satisfies(target))?;
        let object = (step.cast)(object)?;
        (step.target)().upcast(object, target)
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability")
            .field("name", &self.name)
            .field("extends", &self.extends.len())
            .finish()
    }
}

/// Maps a capability trait object type to its descriptor
pub trait CapabilityOf {
    fn descriptor() -> &'static Capability;
}

pub struct CapabilityBinding {
    pub capability: fn() -> &'static Capability,
    pub cast: CastFn,
}

/// Cast used by interface registrations, which have no instances
#[doc(hidden)]
pub fn no_cast(_: AnyInstance) -> Option<AnyObject> {
    None
}

pub struct ComponentRegistration {
    /// Declaring module path
    pub namespace: &'static str,
    pub name: &'static str,
    pub kind: TypeKind,
    pub constructor: Option<Constructor>,
    pub capabilities: &'static [CapabilityBinding],
}

inventory::collect!(ComponentRegistration);

impl ComponentRegistration {
    pub fn qualified_name(&self) -> String {
        format!("{}{}{}", self.namespace, NAMESPACE_SEPARATOR, self.name)
    }

    /// Entry name inside the embedded registry root, e.g. `app/jobs/Warmup.component`
    pub fn resource_path(&self) -> String {
        let mut path = self.namespace.replace(NAMESPACE_SEPARATOR, "/");
        path.push('/');
        path.push_str(self.name);
        path.push_str(COMPONENT_SUFFIX);
        path
    }
}

/// All registrations linked into the binary
pub fn registrations() -> impl Iterator<Item = &'static ComponentRegistration> {
    inventory::iter::<ComponentRegistration>.into_iter()
}

/// Handle to a registered type
#[derive(Clone, Copy)]
pub struct TypeHandle {
    registration: &'static ComponentRegistration,
}

impl TypeHandle {
    pub fn new(registration: &'static ComponentRegistration) -> Self {
        Self { registration }
    }

    pub fn name(&self) -> &'static str {
        self.registration.name
    }

    pub fn namespace(&self) -> &'static str {
        self.registration.namespace
    }

    pub fn qualified_name(&self) -> String {
        self.registration.qualified_name()
    }

    pub fn kind(&self) -> TypeKind {
        self.registration.kind
    }

    pub fn is_interface(&self) -> bool {
        self.registration.kind == TypeKind::Interface
    }

    pub fn is_abstract(&self) -> bool {
        self.registration.kind == TypeKind::Abstract
    }

    /// Whether the type provides `capability`, directly or through a sub-capability
    pub fn implements(&self, capability: &Capability) -> bool {
        self.registration
            .capabilities
            .iter()
            .any(|binding| (binding.capability)().satisfies(capability))
    }

    /// Run the registered constructor.
    ///
    /// Errors and panics raised by the constructor are both reported as
    /// [`DiscoveryError`]s.
    pub fn instantiate(&self) -> Result<AnyInstance, DiscoveryError> {
        let constructor = match (self.registration.kind, self.registration.constructor) {
            (TypeKind::Concrete, Some(constructor)) => constructor,
            (kind, _) => {
                return Err(DiscoveryError::NotConstructible {
                    type_name: self.qualified_name(),
                    kind,
                });
            }
        };

        match catch_unwind(AssertUnwindSafe(constructor)) {
            Ok(result) => result,
            Err(payload) => Err(DiscoveryError::ConstructorPanicked {
                type_name: self.qualified_name(),
                message: panic_message(payload.as_ref()),
            }),
        }
    }

    /// Instantiate the type as the trait object of `capability`.
    ///
    /// `T` must be the trait object type the capability was declared for,
    /// e.g. `instantiate_as::<dyn Lifecycle>(&LIFECYCLE)`.
    pub fn instantiate_as<T>(&self, capability: &Capability) -> Result<Arc<T>, DiscoveryError>
    where
        T: ?Sized + 'static,
    {
        let missing = || DiscoveryError::missing_binding(self.qualified_name(), capability.name);

        let binding = self
            .registration
            .capabilities
            .iter()
            .find(|binding| (binding.capability)().satisfies(capability))
            .ok_or_else(missing)?;

        let instance = self.instantiate()?;
        let object = (binding.cast)(instance).ok_or_else(missing)?;
        let object = (binding.capability)()
            .upcast(object, capability)
            .ok_or_else(missing)?;

        object
            .downcast::<Arc<T>>()
            .map(|boxed| *boxed)
            .map_err(|_| missing())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.registration.namespace == other.registration.namespace
            && self.registration.name == other.registration.name
    }
}

impl Eq for TypeHandle {}

impl Hash for TypeHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.registration.namespace.hash(state);
        self.registration.name.hash(state);
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHandle({} [{}])", self.qualified_name(), self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::fixtures::*;
    use crate::scan::{RegistryLoader, TypeLoader};

    fn handle(name: &str) -> TypeHandle {
        RegistryLoader
            .load(&format!("bootkit::scan::fixtures::{name}"))
            .unwrap()
    }

    #[test]
    fn test_registration_paths() {
        let english = handle("English");
        assert_eq!(english.namespace(), "bootkit::scan::fixtures");
        assert_eq!(english.qualified_name(), "bootkit::scan::fixtures::English");
        assert_eq!(english.kind(), TypeKind::Concrete);

        let registration = registrations()
            .find(|r| r.name == "Spanish")
            .unwrap();
        assert_eq!(
            registration.resource_path(),
            "bootkit/scan/fixtures/nested/Spanish.component"
        );
    }

    #[test]
    fn test_capability_graph() {
        assert!(LOUD_GREETER.satisfies(&GREETER));
        assert!(!GREETER.satisfies(&LOUD_GREETER));
        assert!(handle("Pirate").implements(&GREETER));
        assert!(handle("Pirate").implements(&LOUD_GREETER));
        assert!(!handle("English").implements(&LOUD_GREETER));
        assert!(!handle("Unrelated").implements(&GREETER));
    }

    #[test]
    fn test_instantiate_as_direct_and_upcast() {
        let english = handle("English")
            .instantiate_as::<dyn Greeter>(&GREETER)
            .unwrap();
        assert_eq!(english.greet(), "hello");

        let pirate = handle("Pirate")
            .instantiate_as::<dyn Greeter>(&GREETER)
            .unwrap();
        assert_eq!(pirate.greet(), "ahoy");

        let loud = handle("Pirate")
            .instantiate_as::<dyn LoudGreeter>(&LOUD_GREETER)
            .unwrap();
        assert_eq!(loud.shout(), "AHOY");
    }

    #[test]
    fn test_instantiation_failures() {
        let result = handle("Broken").instantiate();
        assert!(matches!(
            result,
            Err(DiscoveryError::ConstructorFailed { ref type_name, ref message })
                if type_name == "bootkit::scan::fixtures::Broken"
                    && message.contains("missing credentials")
        ));

        let result = handle("Exploding").instantiate();
        assert!(matches!(
            result,
            Err(DiscoveryError::ConstructorPanicked { ref message, .. }) if message.contains("boom")
        ));

        let result = handle("BaseGreeter").instantiate();
        assert!(matches!(
            result,
            Err(DiscoveryError::NotConstructible {
                kind: TypeKind::Abstract,
                ..
            })
        ));

        let result = handle("Greeter").instantiate();
        assert!(matches!(
            result,
            Err(DiscoveryError::NotConstructible {
                kind: TypeKind::Interface,
                ..
            })
        ));

        let result = handle("Unrelated").instantiate_as::<dyn Greeter>(&GREETER);
        assert!(matches!(result, Err(DiscoveryError::MissingBinding { .. })));
    }

    #[test]
    fn test_kind_attribute_registers_abstract_type() {
        let base = handle("BaseGreeter");
        assert_eq!(base.kind(), TypeKind::Abstract);
        assert!(base.is_abstract());
        assert!(base.implements(&GREETER));
    }

    #[test]
    fn test_capability_declaration_registers_interface() {
        let greeter = handle("Greeter");
        assert_eq!(greeter.kind(), TypeKind::Interface);
        assert!(greeter.implements(&GREETER));
        assert!(handle("LoudGreeter").implements(&GREETER));
    }
}
