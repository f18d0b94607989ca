//! The in-memory value model.
//!
//! [`Value`] is the closed set of variants the codec understands. Struct
//! fields convert to and from it through [`FieldValue`].

// -----------------------------------------------------------------------------
// Modules

mod bytes;
mod error;
mod field_value;
mod function;
mod opaque;

// -----------------------------------------------------------------------------
// Exports

pub use bytes::{ByteArray, Bytes};
pub use error::ValueError;
pub use field_value::FieldValue;
pub use function::{CallableKind, FunctionRef, NativeFn, ParamSpec};
pub use opaque::OpaqueValue;

// -----------------------------------------------------------------------------
// Value

use std::path::PathBuf;

use chrono::NaiveDateTime;
use indexmap::IndexMap;

use crate::Object;
use crate::info::DynamicTypePath;

/// A dynamically typed value.
///
/// `Set` keeps insertion order but holds no duplicates and compares without
/// regard to order. `Int` and `UInt` compare by numeric value.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    /// String-keyed mapping.
    ///
    /// Outside a `collection::::dict` attribute, a decoded JSON object has
    /// its keys read as attribute tags, so a key containing the `::::`
    /// delimiter (for example `path::::x` inside a list) does not survive
    /// the document.
    Map(IndexMap<String, Value>),
    List(Vec<Value>),
    Set(Vec<Value>),
    Tuple(Vec<Value>),
    Bytes(Vec<u8>),
    ByteArray(Vec<u8>),
    Path(PathBuf),
    Callable(FunctionRef),
    DateTime(NaiveDateTime),
    Object(Box<dyn Object>),
    Opaque(OpaqueValue),
}

impl Value {
    /// Builds a `Set`, dropping repeated elements.
    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        let mut unique: Vec<Value> = Vec::new();
        for item in items {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        Value::Set(unique)
    }

    /// Wraps an object.
    #[inline]
    pub fn object(object: impl Object) -> Self {
        Value::Object(Box::new(object))
    }

    /// A short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::UInt(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Map(_) => "map",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Tuple(_) => "tuple",
            Value::Bytes(_) => "bytes",
            Value::ByteArray(_) => "bytearray",
            Value::Path(_) => "path",
            Value::Callable(_) => "callable",
            Value::DateTime(_) => "datetime",
            Value::Object(_) => "object",
            Value::Opaque(_) => "opaque value",
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&dyn Object> {
        match self {
            Value::Object(object) => Some(object.as_ref()),
            _ => None,
        }
    }

    /// Unwraps an object of type `T`.
    pub fn into_object<T: Object>(self) -> Result<T, ValueError> {
        match self {
            Value::Object(object) => object.take::<T>().map_err(|other| ValueError::WrongObject {
                expected: core::any::type_name::<T>(),
                found: other.reflect_type_path(),
            }),
            other => Err(ValueError::mismatch("object", &other)),
        }
    }
}

fn int_eq(signed: i64, unsigned: u64) -> bool {
    u64::try_from(signed).is_ok_and(|value| value == unsigned)
}

fn unordered_eq(left: &[Value], right: &[Value]) -> bool {
    left.len() == right.len() && left.iter().all(|item| right.contains(item))
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Int(a), Value::UInt(b)) | (Value::UInt(b), Value::Int(a)) => int_eq(*a, *b),
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => unordered_eq(a, b),
            (Value::Bytes(a), Value::Bytes(b)) | (Value::ByteArray(a), Value::ByteArray(b)) => {
                a == b
            }
            (Value::Path(a), Value::Path(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.object_eq(b.as_ref()),
            (Value::Opaque(a), Value::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}
