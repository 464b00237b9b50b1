use proc_macro::TokenStream;

mod component;

/// Derive macro registering a type in the bootkit component registry
///
/// The type is recorded under the module it is declared in, so a scan of
/// that namespace (or any parent namespace) discovers it.
///
/// # Attributes
///
/// - `provides(Trait, ...)`: capabilities the type can be instantiated as.
///   Every listed trait must have been declared with `bootkit::capability!`.
/// - `constructor = "path::to::fn"`: a `fn() -> Result<Self, E>` used instead
///   of `Default::default()`. Any `E: Into<anyhow::Error>` is accepted.
/// - `kind = "abstract"`: register the type without a constructor. Abstract
///   types are discovered but never instantiated. The default is `"concrete"`.
///
/// # Example
/// ```ignore
/// use bootkit::prelude::*;
///
/// #[derive(Default, Component)]
/// #[component(provides(Lifecycle))]
/// pub struct CacheWarmup;
///
/// impl Lifecycle for CacheWarmup {
///     fn on_load(&self) -> Result<(), LifecycleError> {
///         tracing::info!("warming caches");
///         Ok(())
///     }
/// }
/// ```
#[proc_macro_derive(Component, attributes(component))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    component::derive_component(input)
}
