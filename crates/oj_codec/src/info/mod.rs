//! Type identity: paths and the Type Keys derived from them.

// -----------------------------------------------------------------------------
// Modules

mod type_key;
mod type_path;

// -----------------------------------------------------------------------------
// Exports

pub use type_key::{BUILTIN_CRATES, is_builtin};
pub use type_key::{derive_display_key, derive_key, key_of, split_type_name};
pub use type_path::{DynamicTypePath, TypePath, TypePathTable};
