use darling::util::PathList;
use darling::{FromDeriveInput, FromMeta};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, DeriveInput, Generics, Ident, Path};

#[derive(FromDeriveInput)]
#[darling(attributes(component))]
struct ComponentArgs {
    ident: Ident,
    generics: Generics,
    #[darling(default)]
    provides: PathList,
    #[darling(default)]
    constructor: Option<Path>,
    #[darling(default)]
    kind: Option<ComponentKind>,
}

/// `kind = "..."`; `abstract` itself is a reserved word and cannot be a bare flag
#[derive(FromMeta, Clone, Copy, PartialEq, Eq)]
enum ComponentKind {
    #[darling(rename = "concrete")]
    Concrete,
    #[darling(rename = "abstract")]
    Abstract,
}

pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let args = match ComponentArgs::from_derive_input(&input) {
        Ok(args) => args,
        Err(err) => return TokenStream::from(err.write_errors()),
    };

    if !args.generics.params.is_empty() {
        return syn::Error::new_spanned(
            &args.generics,
            "#[derive(Component)] requires a concrete type without generic parameters",
        )
        .to_compile_error()
        .into();
    }

    TokenStream::from(generate_registration(&args))
}

fn generate_registration(args: &ComponentArgs) -> TokenStream2 {
    let ident = &args.ident;
    let is_abstract = args.kind == Some(ComponentKind::Abstract);

    let kind = if is_abstract {
        quote!(::bootkit::scan::TypeKind::Abstract)
    } else {
        quote!(::bootkit::scan::TypeKind::Concrete)
    };

    let (construct_fn, constructor) = if is_abstract {
        (quote!(), quote!(::core::option::Option::None))
    } else {
        let instance = match &args.constructor {
            Some(path) => quote! {
                #path().map_err(|err| {
                    ::bootkit::scan::DiscoveryError::constructor_failed(
                        ::core::concat!(
                            ::core::module_path!(),
                            "::",
                            ::core::stringify!(#ident)
                        ),
                        err,
                    )
                })?
            },
            None => quote!(<#ident as ::core::default::Default>::default()),
        };
        (
            quote! {
                fn __bootkit_construct() -> ::core::result::Result<
                    ::std::sync::Arc<dyn ::core::any::Any + ::core::marker::Send + ::core::marker::Sync>,
                    ::bootkit::scan::DiscoveryError,
                > {
                    let instance: #ident = #instance;
                    ::core::result::Result::Ok(::std::sync::Arc::new(instance))
                }
            },
            quote!(::core::option::Option::Some(__bootkit_construct)),
        )
    };

    // One caster per provided capability: Arc<dyn Any> -> Box<Arc<dyn Capability>>
    let casts = args.provides.iter().enumerate().map(|(index, capability)| {
        let cast_fn = format_ident!("__bootkit_cast_{}", index);
        let fn_def = quote! {
            fn #cast_fn(
                instance: ::std::sync::Arc<dyn ::core::any::Any + ::core::marker::Send + ::core::marker::Sync>,
            ) -> ::core::option::Option<
                ::std::boxed::Box<dyn ::core::any::Any + ::core::marker::Send + ::core::marker::Sync>,
            > {
                let concrete = instance.downcast::<#ident>().ok()?;
                let object: ::std::sync::Arc<dyn #capability> = concrete;
                ::core::option::Option::Some(::std::boxed::Box::new(object))
            }
        };
        let binding = quote! {
            ::bootkit::scan::CapabilityBinding {
                capability: <dyn #capability as ::bootkit::scan::CapabilityOf>::descriptor,
                cast: #cast_fn,
            }
        };
        (fn_def, binding)
    });
    let (cast_fns, bindings): (Vec<_>, Vec<_>) = casts.unzip();

    quote! {
        const _: () = {
            #construct_fn

            #(#cast_fns)*

            ::bootkit::inventory::submit! {
                ::bootkit::scan::ComponentRegistration {
                    namespace: ::core::module_path!(),
                    name: ::core::stringify!(#ident),
                    kind: #kind,
                    constructor: #constructor,
                    capabilities: &[#(#bindings),*],
                }
            }
        };
    }
}
