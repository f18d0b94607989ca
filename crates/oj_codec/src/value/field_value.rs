use core::hash::{BuildHasher, Hash};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDateTime;
use indexmap::IndexMap;

use super::{ByteArray, Bytes, FunctionRef, OpaqueValue, Value, ValueError};
use crate::info::key_of;
use crate::json::{DATETIME_FORMAT, UNSERIALIZABLE};
use crate::{Object, RegistryError};
use crate::registry::TypeRegistry;

/// Conversion between a field type and [`Value`].
///
/// `#[derive(Serializable)]` implements it for the annotated struct, and
/// every field of such a struct must implement it.
pub trait FieldValue: Sized {
    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, ValueError>;

    /// Registers the object types reachable through this type.
    fn register_dependencies(_registry: &mut TypeRegistry) -> Result<(), RegistryError> {
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Scalars

impl FieldValue for Value {
    #[inline]
    fn to_value(&self) -> Value {
        self.clone()
    }

    #[inline]
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(value)
    }
}

impl FieldValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(flag) => Ok(flag),
            other => Err(ValueError::mismatch("bool", &other)),
        }
    }
}

fn out_of_range<T>(value: impl ToString) -> ValueError {
    ValueError::OutOfRange {
        target: core::any::type_name::<T>(),
        value: value.to_string(),
    }
}

macro_rules! impl_signed {
    ($($ty:ty),*) => {$(
        impl FieldValue for $ty {
            #[inline]
            fn to_value(&self) -> Value {
                Value::Int(i64::from(*self))
            }

            fn from_value(value: Value) -> Result<Self, ValueError> {
                match value {
                    Value::Int(n) => <$ty>::try_from(n).map_err(|_| out_of_range::<$ty>(n)),
                    Value::UInt(n) => <$ty>::try_from(n).map_err(|_| out_of_range::<$ty>(n)),
                    other => Err(ValueError::mismatch("integer", &other)),
                }
            }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($ty:ty),*) => {$(
        impl FieldValue for $ty {
            #[inline]
            fn to_value(&self) -> Value {
                Value::UInt(u64::from(*self))
            }

            fn from_value(value: Value) -> Result<Self, ValueError> {
                match value {
                    Value::Int(n) => <$ty>::try_from(n).map_err(|_| out_of_range::<$ty>(n)),
                    Value::UInt(n) => <$ty>::try_from(n).map_err(|_| out_of_range::<$ty>(n)),
                    other => Err(ValueError::mismatch("integer", &other)),
                }
            }
        }
    )*};
}

impl_signed!(i8, i16, i32, i64);
impl_unsigned!(u8, u16, u32, u64);

impl FieldValue for isize {
    fn to_value(&self) -> Value {
        Value::Int(*self as i64)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        i64::from_value(value).and_then(|n| isize::try_from(n).map_err(|_| out_of_range::<isize>(n)))
    }
}

impl FieldValue for usize {
    fn to_value(&self) -> Value {
        Value::UInt(*self as u64)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        u64::from_value(value).and_then(|n| usize::try_from(n).map_err(|_| out_of_range::<usize>(n)))
    }
}

/// Parses the text form of a non-finite float (`NaN`, `inf`, `-inf`).
fn non_finite(text: &str) -> Result<f64, ValueError> {
    match text.parse::<f64>() {
        Ok(x) if !x.is_finite() => Ok(x),
        _ => Err(ValueError::Text {
            expected: "non-finite float",
            text: text.to_owned(),
        }),
    }
}

impl FieldValue for f64 {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    /// Non-finite floats come back from their `repr` tag, or as bare text
    /// when nested in a collection.
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(x) => Ok(x),
            Value::Int(n) => Ok(n as f64),
            Value::UInt(n) => Ok(n as f64),
            Value::String(text) => non_finite(&text),
            Value::Opaque(opaque) if opaque.type_key() == key_of::<f64>() => {
                non_finite(opaque.repr().unwrap_or(UNSERIALIZABLE))
            }
            other => Err(ValueError::mismatch("float", &other)),
        }
    }
}

impl FieldValue for f32 {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        f64::from_value(value).map(|x| x as f32)
    }
}

impl FieldValue for String {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::String(text) => Ok(text),
            other => Err(ValueError::mismatch("string", &other)),
        }
    }
}

impl FieldValue for PathBuf {
    fn to_value(&self) -> Value {
        Value::Path(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Path(path) => Ok(path),
            Value::String(text) => Ok(PathBuf::from(text)),
            other => Err(ValueError::mismatch("path", &other)),
        }
    }
}

impl FieldValue for NaiveDateTime {
    fn to_value(&self) -> Value {
        Value::DateTime(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::DateTime(stamp) => Ok(stamp),
            Value::String(text) => NaiveDateTime::parse_from_str(&text, DATETIME_FORMAT)
                .map_err(|_| ValueError::Text {
                    expected: "timestamp",
                    text,
                }),
            other => Err(ValueError::mismatch("datetime", &other)),
        }
    }
}

/// Byte sequences nested in a collection carry no tag and decode as their
/// base64 text.
fn byte_sequence(value: Value, expected: &'static str) -> Result<Vec<u8>, ValueError> {
    match value {
        Value::Bytes(bytes) | Value::ByteArray(bytes) => Ok(bytes),
        Value::String(text) => Ok(STANDARD.decode(text)?),
        other => Err(ValueError::mismatch(expected, &other)),
    }
}

impl FieldValue for Bytes {
    fn to_value(&self) -> Value {
        Value::Bytes(self.0.clone())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        byte_sequence(value, "bytes").map(Bytes)
    }
}

impl FieldValue for ByteArray {
    fn to_value(&self) -> Value {
        Value::ByteArray(self.0.clone())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        byte_sequence(value, "bytearray").map(ByteArray)
    }
}

impl FieldValue for FunctionRef {
    fn to_value(&self) -> Value {
        Value::Callable(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Callable(function) => Ok(function),
            other => Err(ValueError::mismatch("callable", &other)),
        }
    }
}

impl FieldValue for OpaqueValue {
    fn to_value(&self) -> Value {
        Value::Opaque(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Opaque(opaque) => Ok(opaque),
            other => Err(ValueError::mismatch("opaque value", &other)),
        }
    }
}

// -----------------------------------------------------------------------------
// Wrappers

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, T::to_value)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }

    #[inline]
    fn register_dependencies(registry: &mut TypeRegistry) -> Result<(), RegistryError> {
        T::register_dependencies(registry)
    }
}

impl<T: FieldValue> FieldValue for Box<T> {
    #[inline]
    fn to_value(&self) -> Value {
        T::to_value(self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        T::from_value(value).map(Box::new)
    }

    #[inline]
    fn register_dependencies(registry: &mut TypeRegistry) -> Result<(), RegistryError> {
        T::register_dependencies(registry)
    }
}

/// Any registered object; the concrete type is restored from its Type Key.
///
/// Nothing is registered through this type, so the possible object types
/// must be registered on their own (or through `auto_register`).
impl FieldValue for Box<dyn Object> {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Object(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Object(object) => Ok(object),
            other => Err(ValueError::mismatch("object", &other)),
        }
    }
}

// -----------------------------------------------------------------------------
// Collections

fn sequence(value: Value, expected: &'static str) -> Result<Vec<Value>, ValueError> {
    match value {
        Value::List(items) | Value::Set(items) | Value::Tuple(items) => Ok(items),
        other => Err(ValueError::mismatch(expected, &other)),
    }
}

fn mapping(value: Value) -> Result<IndexMap<String, Value>, ValueError> {
    match value {
        Value::Map(entries) => Ok(entries),
        other => Err(ValueError::mismatch("map", &other)),
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(T::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        sequence(value, "list")?.into_iter().map(T::from_value).collect()
    }

    #[inline]
    fn register_dependencies(registry: &mut TypeRegistry) -> Result<(), RegistryError> {
        T::register_dependencies(registry)
    }
}

impl<T, S> FieldValue for HashSet<T, S>
where
    T: FieldValue + Eq + Hash,
    S: BuildHasher + Default,
{
    fn to_value(&self) -> Value {
        Value::Set(self.iter().map(T::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        sequence(value, "set")?.into_iter().map(T::from_value).collect()
    }

    #[inline]
    fn register_dependencies(registry: &mut TypeRegistry) -> Result<(), RegistryError> {
        T::register_dependencies(registry)
    }
}

impl<T: FieldValue + Ord> FieldValue for BTreeSet<T> {
    fn to_value(&self) -> Value {
        Value::Set(self.iter().map(T::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        sequence(value, "set")?.into_iter().map(T::from_value).collect()
    }

    #[inline]
    fn register_dependencies(registry: &mut TypeRegistry) -> Result<(), RegistryError> {
        T::register_dependencies(registry)
    }
}

macro_rules! impl_string_map {
    () => {
        fn to_value(&self) -> Value {
            Value::Map(
                self.iter()
                    .map(|(key, value)| (key.clone(), value.to_value()))
                    .collect(),
            )
        }

        fn from_value(value: Value) -> Result<Self, ValueError> {
            mapping(value)?
                .into_iter()
                .map(|(key, value)| Ok((key, T::from_value(value)?)))
                .collect()
        }

        #[inline]
        fn register_dependencies(registry: &mut TypeRegistry) -> Result<(), RegistryError> {
            T::register_dependencies(registry)
        }
    };
}

impl<T: FieldValue, S: BuildHasher + Default> FieldValue for HashMap<String, T, S> {
    impl_string_map!();
}

impl<T: FieldValue> FieldValue for BTreeMap<String, T> {
    impl_string_map!();
}

impl<T: FieldValue, S: BuildHasher + Default> FieldValue for IndexMap<String, T, S> {
    impl_string_map!();
}

macro_rules! impl_tuple {
    ($len:literal => $($name:ident : $idx:tt),+) => {
        impl<$($name: FieldValue),+> FieldValue for ($($name,)+) {
            fn to_value(&self) -> Value {
                Value::Tuple(vec![$(self.$idx.to_value()),+])
            }

            fn from_value(value: Value) -> Result<Self, ValueError> {
                let items = sequence(value, "tuple")?;
                if items.len() != $len {
                    return Err(ValueError::Length { expected: $len, found: items.len() });
                }
                let mut items = items.into_iter();
                Ok(($(
                    match items.next() {
                        Some(item) => $name::from_value(item)?,
                        None => return Err(ValueError::Length { expected: $len, found: $idx }),
                    },
                )+))
            }

            fn register_dependencies(registry: &mut TypeRegistry) -> Result<(), RegistryError> {
                $($name::register_dependencies(registry)?;)+
                Ok(())
            }
        }
    };
}

impl_tuple!(1 => A: 0);
impl_tuple!(2 => A: 0, B: 1);
impl_tuple!(3 => A: 0, B: 1, C: 2);
impl_tuple!(4 => A: 0, B: 1, C: 2, D: 3);

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashSet};

    use super::FieldValue;
    use crate::value::{Bytes, OpaqueValue, Value, ValueError};

    #[test]
    fn integer_range() {
        assert_eq!(u8::from_value(Value::Int(255)), Ok(255));
        assert!(matches!(
            u8::from_value(Value::Int(256)),
            Err(ValueError::OutOfRange { .. })
        ));
        assert_eq!(i32::from_value(Value::UInt(7)), Ok(7));
    }

    #[test]
    fn set_from_list() {
        let set = HashSet::<String>::from_value(Value::List(vec!["a".into(), "a".into()])).unwrap();
        assert_eq!(set.len(), 1);
        assert!(matches!(set.to_value(), Value::Set(items) if items.len() == 1));
    }

    #[test]
    fn tuple_arity() {
        let pair = (1_i64, String::from("x"));
        let value = pair.to_value();
        assert!(matches!(&value, Value::Tuple(items) if items.len() == 2));
        assert_eq!(<(i64, String)>::from_value(value), Ok(pair));
        assert_eq!(
            <(i64, i64, i64)>::from_value(Value::Tuple(vec![Value::Int(1)])),
            Err(ValueError::Length { expected: 3, found: 1 })
        );
    }

    #[test]
    fn option_and_map() {
        let mut map = BTreeMap::new();
        map.insert("k".to_owned(), Some(Bytes(vec![1, 2])));
        map.insert("n".to_owned(), None);
        let back = BTreeMap::<String, Option<Bytes>>::from_value(map.to_value()).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn untagged_text_forms() {
        assert_eq!(Bytes::from_value(Value::from("aGk=")), Ok(Bytes(b"hi".to_vec())));
        assert!(matches!(
            Bytes::from_value(Value::from("%%")),
            Err(ValueError::Base64(_))
        ));

        assert_eq!(f64::from_value(Value::from("inf")), Ok(f64::INFINITY));
        let repr = OpaqueValue::new("f64", Some("NaN".to_owned()));
        assert!(f64::from_value(Value::Opaque(repr)).is_ok_and(f64::is_nan));
        assert!(matches!(
            f64::from_value(Value::from("1.5")),
            Err(ValueError::Text { .. })
        ));
        assert!(matches!(
            f64::from_value(Value::Opaque(OpaqueValue::new("pkg.level", None))),
            Err(ValueError::Mismatch { .. })
        ));
    }

    #[test]
    fn mismatch_reports_kinds() {
        assert_eq!(
            bool::from_value(Value::from("yes")),
            Err(ValueError::Mismatch { expected: "bool", found: "string" })
        );
    }
}
