use core::ops::{Deref, DerefMut};

/// An immutable byte sequence, tagged `collection::::bytes`.
///
/// A bare `Vec<u8>` is a list of integers; wrap it to keep the byte kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bytes(pub Vec<u8>);

/// A mutable byte sequence, tagged `collection::::bytearray`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteArray(pub Vec<u8>);

macro_rules! impl_byte_wrapper {
    ($name:ident) => {
        impl From<Vec<u8>> for $name {
            #[inline]
            fn from(bytes: Vec<u8>) -> Self {
                Self(bytes)
            }
        }

        impl From<&[u8]> for $name {
            #[inline]
            fn from(bytes: &[u8]) -> Self {
                Self(bytes.to_vec())
            }
        }

        impl Deref for $name {
            type Target = Vec<u8>;

            #[inline]
            fn deref(&self) -> &Vec<u8> {
                &self.0
            }
        }

        impl DerefMut for $name {
            #[inline]
            fn deref_mut(&mut self) -> &mut Vec<u8> {
                &mut self.0
            }
        }
    };
}

impl_byte_wrapper!(Bytes);
impl_byte_wrapper!(ByteArray);
