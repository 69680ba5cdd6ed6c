#![allow(unreachable_pub)]

//! # Macros
//!
//! Procedural macros shared by the broker workspace.
//!
//! Right now this is a single attribute, [`macro@osb_error`], which turns a plain enum into
//! the error type every crate in the workspace exposes.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for domain error enums.
///
/// # Generated items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * A `<Name>Ext` trait adding `.context(...)` to `Result<T, Name>` and, for every
///   variant that wraps a `source`, to `Result<T, Source>` as well.
/// * `From<Source>` for variants made of exactly a `source` and a `context` field.
/// * `From<&'static str>` and `From<String>` when an `Internal { message, context }`
///   variant exists.
/// * A module-local `format_context` helper for use inside `#[error(...)]` strings.
///
/// # Requirements
///
/// * Variants must use named fields.
/// * A `context` field must be `Option<Cow<'static, str>>`.
/// * Variants with a source must also carry a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[osb_derive::osb_error]
/// pub enum RegistryError {
///     #[error("Lookup failed{}: {message}", format_context(.context))]
///     Missing { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///
///     #[error("Internal registry error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn osb_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}
