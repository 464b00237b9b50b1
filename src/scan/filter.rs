use super::registry::{Capability, TypeHandle};
use super::scanner::TypeSet;

/// Keep the instantiable types that provide `capability`
pub fn filter(types: &TypeSet, capability: &Capability) -> TypeSet {
    types
        .iter()
        .copied()
        .filter(|handle| is_impl_type(handle, capability))
        .collect()
}

/// Concrete, and provides `capability` directly or through a sub-capability
pub fn is_impl_type(handle: &TypeHandle, capability: &Capability) -> bool {
    handle.implements(capability) && !handle.is_interface() && !handle.is_abstract()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::fixtures::{GREETER, LOUD_GREETER};
    use crate::scan::{ComponentScanner, RegistryLoader, StandardClassPath};
    use std::sync::Arc;

    fn fixtures() -> Arc<TypeSet> {
        ComponentScanner::new(Arc::new(StandardClassPath::new()), Arc::new(RegistryLoader))
            .scan("bootkit::scan::fixtures")
    }

    #[test]
    fn test_filter_keeps_concrete_implementors() {
        let greeters = filter(&fixtures(), &GREETER);

        let mut names = greeters.qualified_names();
        names.sort();
        assert_eq!(
            names,
            vec![
                "bootkit::scan::fixtures::Broken",
                "bootkit::scan::fixtures::English",
                "bootkit::scan::fixtures::Exploding",
                "bootkit::scan::fixtures::Pirate",
                "bootkit::scan::fixtures::nested::Spanish",
            ]
        );
    }

    #[test]
    fn test_filter_by_sub_capability() {
        let loud = filter(&fixtures(), &LOUD_GREETER);
        assert_eq!(loud.qualified_names(), vec!["bootkit::scan::fixtures::Pirate"]);
    }

    #[test]
    fn test_filter_of_empty_set() {
        assert!(filter(&TypeSet::new(), &GREETER).is_empty());
    }
}
