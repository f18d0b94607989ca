//! Derive macro of `oj_codec`.
//!
//! - [`Serializable`]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static OBJSON_ATTRIBUTE_NAME: &str = "objson";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Serializable Derivation
///
/// `#[derive(Serializable)]` implements, for a struct with named fields:
///
/// - `TypePath`
/// - `Object` (requires `Clone`, `PartialEq` and `Debug`)
/// - `GetTypeMeta`: one field descriptor per serialized field, and a
///   constructor taking those fields as named parameters
/// - `FieldValue`, so the struct can be a field of another one
///
/// Every serialized field type must implement `FieldValue`. `FunctionRef`
/// and `OpaqueValue` are only tagged on the attribute itself, so they may be
/// wrapped in `Option` or `Box` but not placed inside a collection or tuple.
///
/// ## Type attributes
///
/// ```rust, ignore
/// #[derive(Serializable, Clone, PartialEq, Debug)]
/// #[objson(type_path = "app::models::User", auto_register)]
/// struct User { /* ... */ }
/// ```
///
/// - `type_path = "..."` replaces `module_path!()` and the struct name, so
///   the Type Key (`app.models.user`) survives moving the struct.
/// - `auto_register` submits the type to the registry inventory (only with
///   the `auto_register` feature of `oj_codec`).
///
/// ## Field attributes
///
/// ```rust, ignore
/// #[derive(Serializable, Clone, PartialEq, Debug)]
/// struct Session {
///     user: String,
///     #[objson(default)]
///     retries: u32,
///     #[objson(skip)]
///     cache: Vec<u8>,
/// }
/// ```
///
/// - `default`: an optional constructor parameter, `Default::default()` when
///   absent from the document.
/// - `skip`: never written or read; `Default::default()` on construction.
#[proc_macro_derive(Serializable, attributes(objson))]
pub fn derive_serializable(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let data = match derive_data::SerializableStruct::from_ast(&ast) {
        Ok(data) => data,
        Err(err) => return err.into_compile_error().into(),
    };

    impls::impl_all(&data).into()
}
