//! Procedural macros for toolbar-actions

use darling::{FromDeriveInput, FromVariant};
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// Container-level attributes for #[derive(Action)]
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(action), supports(enum_any))]
struct ActionOpts {
    ident: syn::Ident,
    data: darling::ast::Data<ActionVariant, ()>,
}

/// Variant-level attributes
#[derive(Debug, FromVariant)]
#[darling(attributes(action))]
struct ActionVariant {
    ident: syn::Ident,
    fields: darling::ast::Fields<()>,

    /// Explicit category
    #[darling(default)]
    category: Option<String>,
}

/// Split a PascalCase string into parts
fn split_pascal_case(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();

    for ch in s.chars() {
        if ch.is_uppercase() && !current.is_empty() {
            parts.push(current);
            current = String::new();
        }
        current.push(ch);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Category for a variant: the explicit one, or `async_result` for `*Did*` completions.
fn resolve_category(variant: &ActionVariant) -> Option<String> {
    if let Some(category) = &variant.category {
        return Some(category.clone());
    }
    let name = variant.ident.to_string();
    split_pascal_case(&name)
        .iter()
        .any(|part| part == "Did")
        .then(|| "async_result".to_string())
}

/// Derive macro for the Action trait
///
/// Generates `name()` returning the variant name and an `ActionCategory`
/// implementation, both named through the `toolbar_actions` facade.
/// Variants containing a `Did` word (e.g. `SaveDidSucceed`)
/// fall into the `async_result` category unless `#[action(category = "...")]`
/// says otherwise.
///
/// # Example
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// enum EditorAction {
///     #[action(category = "selection")]
///     SelectAction(Option<u64>),
///     SaveDidSucceed { generation: u64 },
/// }
///
/// assert_eq!(EditorAction::SelectAction(None).name(), "SelectAction");
/// assert_eq!(EditorAction::SelectAction(None).category(), Some("selection"));
/// ```
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let opts = match ActionOpts::from_derive_input(&input) {
        Ok(opts) => opts,
        Err(e) => return e.write_errors().into(),
    };

    let name = &opts.ident;

    let variants = match &opts.data {
        darling::ast::Data::Enum(variants) => variants,
        _ => {
            return syn::Error::new_spanned(&input, "Action can only be derived for enums")
                .to_compile_error()
                .into();
        }
    };

    let name_arms = variants.iter().map(|v| {
        let variant_name = &v.ident;
        let variant_str = variant_name.to_string();

        match &v.fields.style {
            darling::ast::Style::Unit => quote! {
                #name::#variant_name => #variant_str
            },
            darling::ast::Style::Tuple => quote! {
                #name::#variant_name(..) => #variant_str
            },
            darling::ast::Style::Struct => quote! {
                #name::#variant_name { .. } => #variant_str
            },
        }
    });

    let category_arms = variants.iter().map(|v| {
        let variant_name = &v.ident;
        let category = match resolve_category(v) {
            Some(c) => quote! { ::core::option::Option::Some(#c) },
            None => quote! { ::core::option::Option::None },
        };
        quote! { #name::#variant_name { .. } => #category }
    });

    let expanded = quote! {
        impl ::toolbar_actions::Action for #name {
            fn name(&self) -> &'static str {
                match self {
                    #(#name_arms),*
                }
            }
        }

        impl ::toolbar_actions::ActionCategory for #name {
            fn category(&self) -> ::core::option::Option<&'static str> {
                match self {
                    #(#category_arms,)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}
