//! Derive macros for Snapstore
//!
//! This crate provides procedural macros to reduce boilerplate when building
//! snapshot stores.
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Implements `snapstore_core::action::Action` for action enums
//!
//! # Example
//!
//! ```ignore
//! use snapstore_macros::Action;
//! use snapstore_core::action::Action as _;
//!
//! #[derive(Action, Clone, Debug)]
//! enum TodoAction {
//!     Add { text: String },
//!     ClearAll,
//!     #[action(name = "rename")]
//!     Edit { id: u64, text: String },
//! }
//!
//! assert_eq!(TodoAction::Add { text: "milk".into() }.name(), "add");
//! assert_eq!(TodoAction::ClearAll.name(), "clear_all");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr};

/// Derive macro for Action enums
///
/// Generates an implementation of `snapstore_core::action::Action` whose
/// `name()` returns the variant identifier in `snake_case`.
///
/// # Attributes
///
/// - `#[action(name = "...")]` - Override the name of a single variant
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - An `#[action(...)]` attribute is malformed
/// - Two variants end up with the same name
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut seen = std::collections::HashSet::new();
    let mut name_arms = Vec::new();

    for variant in &data_enum.variants {
        let variant_ident = &variant.ident;

        let action_name = match name_override(&variant.attrs) {
            Ok(Some(name)) => name,
            Ok(None) => to_snake_case(&variant_ident.to_string()),
            Err(err) => return err.to_compile_error().into(),
        };

        if !seen.insert(action_name.clone()) {
            return syn::Error::new_spanned(
                variant,
                format!("Duplicate action name `{action_name}`"),
            )
            .to_compile_error()
            .into();
        }

        let pattern = match &variant.fields {
            Fields::Named(_) => quote! { Self::#variant_ident { .. } },
            Fields::Unnamed(_) => quote! { Self::#variant_ident(..) },
            Fields::Unit => quote! { Self::#variant_ident },
        };

        name_arms.push(quote! { #pattern => #action_name, });
    }

    // An empty enum has no values to match on
    let body = if name_arms.is_empty() {
        quote! { match *self {} }
    } else {
        quote! {
            match self {
                #(#name_arms)*
            }
        }
    };

    let expanded = quote! {
        impl #impl_generics ::snapstore_core::action::Action for #name #ty_generics #where_clause {
            fn name(&self) -> &'static str {
                #body
            }
        }
    };

    TokenStream::from(expanded)
}

/// Read `#[action(name = "...")]` from a variant's attributes.
fn name_override(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut found = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("action")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(meta.error("action name cannot be empty"));
                }
                found = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported action attribute, expected `name = \"...\"`"))
            }
        })?;
    }

    Ok(found)
}

/// `ClearCompleted` → `clear_completed`
fn to_snake_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, ch) in ident.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
