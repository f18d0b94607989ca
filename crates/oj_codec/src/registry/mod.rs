//! Type descriptors and the registry that maps Type Keys to them.

// -----------------------------------------------------------------------------
// Modules

mod constructor;
mod field_info;
mod type_meta;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use constructor::{Arguments, Constructor, ParamInfo};
pub use field_info::FieldInfo;
pub use type_meta::{GetTypeMeta, TypeMeta};
pub use type_registry::TypeRegistry;
