/// Declare a capability trait that components can provide.
///
/// Generates the descriptor static, wires `dyn Trait` to it through
/// [`CapabilityOf`](crate::scan::CapabilityOf) and registers the trait itself
/// as an interface type so namespace scans see it (and filters drop it).
///
/// Super-capabilities listed after the colon must be supertraits of the
/// declared trait.
///
/// ```rust,ignore
/// pub trait Warmup: Lifecycle {
///     fn warm(&self);
/// }
///
/// bootkit::capability!(pub static WARMUP for Warmup: [Lifecycle]);
/// ```
#[macro_export]
macro_rules! capability {
    (
        $(#[$meta:meta])*
        $vis:vis static $name:ident for $cap:path $(: [$($parent:path),+ $(,)?])? $(;)?
    ) => {
        $(#[$meta])*
        $vis static $name: $crate::scan::Capability = $crate::scan::Capability {
            name: ::core::stringify!($cap),
            id: ::core::any::TypeId::of::<dyn $cap>,
            extends: &[$($(
                $crate::scan::Upcast {
                    target: <dyn $parent as $crate::scan::CapabilityOf>::descriptor,
                    cast: |object| {
                        let object = *object.downcast::<::std::sync::Arc<dyn $cap>>().ok()?;
                        let parent: ::std::sync::Arc<dyn $parent> = object;
                        ::core::option::Option::Some(::std::boxed::Box::new(parent))
                    },
                },
            )+)?],
        };

        impl $crate::scan::CapabilityOf for dyn $cap {
            fn descriptor() -> &'static $crate::scan::Capability {
                &$name
            }
        }

        $crate::inventory::submit! {
            $crate::scan::ComponentRegistration {
                namespace: ::core::module_path!(),
                name: ::core::stringify!($cap),
                kind: $crate::scan::TypeKind::Interface,
                constructor: ::core::option::Option::None,
                capabilities: &[$crate::scan::CapabilityBinding {
                    capability: <dyn $cap as $crate::scan::CapabilityOf>::descriptor,
                    cast: $crate::scan::no_cast,
                }],
            }
        }
    };
}
