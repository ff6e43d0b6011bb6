//! Derive macros for Listkeeper
//!
//! This crate provides procedural macros that remove the boilerplate around
//! action enums and state structs.
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates helpers for action enums (commands/events)
//! - `#[derive(State)]` - Generates revision accessors for state structs
//!
//! # Example
//!
//! ```ignore
//! use listkeeper_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum TodoAction {
//!     #[command]
//!     AddTodo { text: String },
//!
//!     #[event]
//!     TodoAdded { id: String, content: String },
//! }
//!
//! assert!(TodoAction::AddTodo { text: "milk".into() }.is_command());
//! assert_eq!(TodoAction::AddTodo { text: "milk".into() }.name(), "AddTodo");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, parse_macro_input};

/// Derive macro for Action enums
///
/// Generates helper methods for action enums:
/// - `is_command()` - Returns true if this variant is a command
/// - `is_event()` - Returns true if this variant is an event
/// - `event_type()` - Returns the versioned event type name (`"<Variant>.v1"`)
/// - `name()` - Returns the bare variant name, for logging
///
/// # Attributes
///
/// - `#[command]` - Mark a variant as a command
/// - `#[event]` - Mark a variant as an event
///
/// Produces a compile error if applied to a non-enum type or if a variant
/// carries both `#[command]` and `#[event]`.
#[proc_macro_derive(Action, attributes(command, event))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(&input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut is_command_arms = Vec::new();
    let mut is_event_arms = Vec::new();
    let mut event_type_arms = Vec::new();
    let mut name_arms = Vec::new();

    for variant in &data_enum.variants {
        let is_command = has_attribute(&variant.attrs, "command");
        let is_event = has_attribute(&variant.attrs, "event");

        if is_command && is_event {
            return syn::Error::new_spanned(variant, "Variant cannot be both #[command] and #[event]")
                .to_compile_error()
                .into();
        }

        let pattern = variant_pattern(&variant.ident, &variant.fields);
        let variant_name = variant.ident.to_string();

        if is_command {
            is_command_arms.push(quote! { #pattern => true, });
        }

        if is_event {
            let type_name = format!("{variant_name}.v1");
            is_event_arms.push(quote! { #pattern => true, });
            event_type_arms.push(quote! { #pattern => #type_name, });
        }

        name_arms.push(quote! { #pattern => #variant_name, });
    }

    let expanded = quote! {
        impl #name {
            /// Returns true if this action is a command
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_command(&self) -> bool {
                match self {
                    #(#is_command_arms)*
                    _ => false,
                }
            }

            /// Returns true if this action is an event
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_event(&self) -> bool {
                match self {
                    #(#is_event_arms)*
                    _ => false,
                }
            }

            /// Returns the event type name for serialization
            ///
            /// Only events have type names. Commands return "unknown".
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn event_type(&self) -> &'static str {
                match self {
                    #(#event_type_arms)*
                    _ => "unknown",
                }
            }

            /// Returns the variant name
            #[must_use]
            pub const fn name(&self) -> &'static str {
                match self {
                    #(#name_arms)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Derive macro for State structs
///
/// Handles the revision field marked with `#[version]`, which must have type
/// `Option<listkeeper_core::version::Version>`. Generates:
/// - `version()` - current revision, `None` before the first change
/// - `set_version()` - overwrite the revision
/// - `bump_version()` - advance the revision by one and return it
/// - an implementation of `listkeeper_core::version::Versioned`
///
/// Structs without a `#[version]` field derive nothing.
///
/// # Example
///
/// ```ignore
/// use listkeeper_macros::State;
/// use listkeeper_core::version::Version;
///
/// #[derive(State, Clone, Debug)]
/// struct ListState {
///     pub items: Vec<String>,
///     #[version]
///     pub version: Option<Version>,
/// }
/// ```
#[proc_macro_derive(State, attributes(version))]
pub fn derive_state(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Struct(data_struct) = &input.data else {
        return syn::Error::new_spanned(&input, "#[derive(State)] can only be used on structs")
            .to_compile_error()
            .into();
    };

    let Some(field) = data_struct
        .fields
        .iter()
        .find(|field| has_attribute(&field.attrs, "version"))
    else {
        return TokenStream::new();
    };

    let Some(field_name) = field.ident.as_ref() else {
        return syn::Error::new_spanned(field, "#[version] requires a named field")
            .to_compile_error()
            .into();
    };

    let expanded = quote! {
        impl #name {
            /// Get the current revision of this state
            #[must_use]
            pub const fn version(&self) -> Option<listkeeper_core::version::Version> {
                self.#field_name
            }

            /// Set the revision of this state
            pub fn set_version(&mut self, version: listkeeper_core::version::Version) {
                self.#field_name = Some(version);
            }

            /// Advance the revision by one and return the new value
            pub fn bump_version(&mut self) -> listkeeper_core::version::Version {
                listkeeper_core::version::Version::advance(&mut self.#field_name)
            }
        }

        impl listkeeper_core::version::Versioned for #name {
            fn version(&self) -> Option<listkeeper_core::version::Version> {
                self.#field_name
            }
        }
    };

    TokenStream::from(expanded)
}

fn variant_pattern(ident: &Ident, fields: &Fields) -> TokenStream2 {
    match fields {
        Fields::Named(_) => quote! { Self::#ident { .. } },
        Fields::Unnamed(_) => quote! { Self::#ident(..) },
        Fields::Unit => quote! { Self::#ident },
    }
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
