use core::any::{Any, TypeId};
use core::fmt;

use crate::info::DynamicTypePath;

/// A value that can be encoded as a typed document.
///
/// Implemented by `#[derive(Serializable)]`, which requires the type to be
/// `Clone`, `PartialEq` and `Debug`. The `Debug` text is the fallback
/// representation used when the type is not registered with a codec.
pub trait Object: DynamicTypePath + Any + fmt::Debug {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn clone_object(&self) -> Box<dyn Object>;

    /// Equality against an object of any type; `false` across types.
    fn object_eq(&self, other: &dyn Object) -> bool;
}

impl dyn Object {
    /// The [`TypeId`] of the concrete type.
    #[inline]
    pub fn object_type_id(&self) -> TypeId {
        self.as_any().type_id()
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }

    /// Downcasts a boxed object, handing it back unchanged on mismatch.
    pub fn downcast<T: Any>(self: Box<Self>) -> Result<Box<T>, Box<dyn Object>> {
        if !self.is::<T>() {
            return Err(self);
        }
        match self.into_any().downcast::<T>() {
            Ok(value) => Ok(value),
            Err(_) => unreachable!("type checked above"),
        }
    }

    /// Downcasts and unboxes.
    #[inline]
    pub fn take<T: Any>(self: Box<Self>) -> Result<T, Box<dyn Object>> {
        self.downcast::<T>().map(|value| *value)
    }
}

impl Clone for Box<dyn Object> {
    #[inline]
    fn clone(&self) -> Self {
        self.clone_object()
    }
}

impl PartialEq for dyn Object {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.object_eq(other)
    }
}

#[cfg(test)]
mod tests {
    use crate::Object;
    use crate::info::DynamicTypePath;

    #[derive(crate::Serializable, Clone, PartialEq, Debug)]
    #[objson(type_path = "zoo::Cat")]
    struct Cat {
        lives: u8,
    }

    #[derive(crate::Serializable, Clone, PartialEq, Debug)]
    #[objson(type_path = "zoo::Dog")]
    struct Dog {
        lives: u8,
    }

    #[test]
    fn downcast_round() {
        let boxed: Box<dyn Object> = Box::new(Cat { lives: 9 });
        assert!(boxed.is::<Cat>());
        let boxed = boxed.downcast::<Dog>().unwrap_err();
        assert_eq!(boxed.take::<Cat>().unwrap(), Cat { lives: 9 });
    }

    #[test]
    fn equality_across_types() {
        let cat: Box<dyn Object> = Box::new(Cat { lives: 1 });
        let dog: Box<dyn Object> = Box::new(Dog { lives: 1 });
        assert!(*cat != *dog);
        assert!(*cat == *cat.clone());
        assert_eq!(cat.reflect_type_key(), "zoo.cat");
    }
}
