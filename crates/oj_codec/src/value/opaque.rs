use core::fmt::Debug;

use crate::info::key_of;

/// A value with no JSON form, kept as its type key and textual
/// representation.
///
/// With a representation it encodes under a `repr` tag. Without one it
/// encodes as the `UNSERIALIZABLE` marker. Decoding yields the same
/// `OpaqueValue`; the original value is not rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpaqueValue {
    type_key: String,
    repr: Option<String>,
}

impl OpaqueValue {
    #[inline]
    pub fn new(type_key: impl Into<String>, repr: Option<String>) -> Self {
        Self {
            type_key: type_key.into(),
            repr,
        }
    }

    /// Captures the `Debug` text of `value`.
    ///
    /// ```
    /// use oj_codec::value::OpaqueValue;
    ///
    /// let opaque = OpaqueValue::of(&std::time::Duration::from_secs(1));
    /// assert_eq!(opaque.type_key(), "duration");
    /// assert_eq!(opaque.repr(), Some("1s"));
    /// ```
    pub fn of<T: Debug + ?Sized>(value: &T) -> Self {
        Self::new(key_of::<T>(), Some(format!("{value:?}")))
    }

    /// A value of type `T` whose representation could not be produced.
    pub fn unserializable<T: ?Sized>() -> Self {
        Self::new(key_of::<T>(), None)
    }

    #[inline]
    pub fn type_key(&self) -> &str {
        &self.type_key
    }

    #[inline]
    pub fn repr(&self) -> Option<&str> {
        self.repr.as_deref()
    }

    #[inline]
    pub fn is_unserializable(&self) -> bool {
        self.repr.is_none()
    }
}
