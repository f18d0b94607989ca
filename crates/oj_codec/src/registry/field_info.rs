use core::any::type_name;
use core::fmt;

use crate::Object;
use crate::info::DynamicTypePath;
use crate::value::{FieldValue, Value, ValueError};

type Getter = Box<dyn Fn(&dyn Object) -> Option<Value> + Send + Sync>;
type Setter = Box<dyn Fn(&mut dyn Object, Value) -> Result<(), ValueError> + Send + Sync>;

/// A named attribute of a registered type, with a read/write accessor pair.
///
/// Both accessors are type-erased; they fail softly when given an object of
/// another type (`get` returns `None`, `set` a [`ValueError::WrongObject`]).
pub struct FieldInfo {
    name: &'static str,
    type_name: &'static str,
    getter: Getter,
    setter: Setter,
}

impl FieldInfo {
    /// Describes field `name` of `T`, of type `F`.
    ///
    /// ```
    /// use oj_codec::registry::FieldInfo;
    /// # #[derive(oj_codec::Serializable, Clone, PartialEq, Debug)]
    /// # struct Point { x: i64 }
    ///
    /// let field = FieldInfo::new::<Point, i64>("x", |p| &p.x, |p| &mut p.x);
    /// let mut point = Point { x: 1 };
    /// field.set(&mut point, oj_codec::value::Value::Int(5)).unwrap();
    /// assert_eq!(point.x, 5);
    /// ```
    pub fn new<T: Object, F: FieldValue + 'static>(
        name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        Self {
            name,
            type_name: type_name::<F>(),
            getter: Box::new(move |object: &dyn Object| object.downcast_ref::<T>().map(|v| get(v).to_value())),
            setter: Box::new(move |object: &mut dyn Object, value: Value| {
                let found = object.reflect_type_path();
                let target = object
                    .downcast_mut::<T>()
                    .ok_or(ValueError::WrongObject {
                        expected: type_name::<T>(),
                        found,
                    })?;
                *get_mut(target) = F::from_value(value)?;
                Ok(())
            }),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Compiler name of the field type.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Reads the field as a [`Value`].
    #[inline]
    pub fn get(&self, object: &dyn Object) -> Option<Value> {
        (self.getter)(object)
    }

    /// Overwrites the field.
    #[inline]
    pub fn set(&self, object: &mut dyn Object, value: Value) -> Result<(), ValueError> {
        (self.setter)(object, value)
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .finish()
    }
}
