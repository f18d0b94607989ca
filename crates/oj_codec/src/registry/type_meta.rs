use core::any::TypeId;

use super::{Constructor, FieldInfo, TypeRegistry};
use crate::info::{TypePath, TypePathTable};
use crate::{Object, RegistryError};

/// The descriptor of a registered type.
///
/// Holds the Type Key, the ordered field accessors and, when the type can
/// be built from a document, its [`Constructor`].
#[derive(Debug)]
pub struct TypeMeta {
    table: TypePathTable,
    fields: Vec<FieldInfo>,
    constructor: Option<Constructor>,
}

impl TypeMeta {
    /// An empty descriptor for `T`.
    ///
    /// ```
    /// use oj_codec::registry::{Constructor, FieldInfo, TypeMeta};
    /// # #[derive(oj_codec::Serializable, Clone, PartialEq, Debug, Default)]
    /// # #[objson(type_path = "geo::Point")]
    /// # struct Point { x: i64 }
    ///
    /// let meta = TypeMeta::of::<Point>()
    ///     .with_field(FieldInfo::new::<Point, i64>("x", |p| &p.x, |p| &mut p.x))
    ///     .with_constructor(Constructor::from_default::<Point>());
    ///
    /// assert_eq!(meta.key(), "geo.point");
    /// assert!(meta.field("x").is_some());
    /// ```
    pub fn of<T: Object + TypePath>() -> Self {
        Self {
            table: TypePathTable::of::<T>(),
            fields: Vec::new(),
            constructor: None,
        }
    }

    /// Appends a field; declaration order is the attribute order.
    pub fn with_field(mut self, field: FieldInfo) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.table.type_id()
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.table.path()
    }

    #[inline]
    pub fn type_path_table(&self) -> &TypePathTable {
        &self.table
    }

    /// The lowercase Type Key.
    #[inline]
    pub fn key(&self) -> &str {
        self.table.key()
    }

    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name() == name)
    }

    #[inline]
    pub fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }
}

/// Provides the [`TypeMeta`] of a type.
///
/// Implemented by `#[derive(Serializable)]`.
pub trait GetTypeMeta: Object + TypePath {
    fn get_type_meta() -> TypeMeta;

    /// Registers the object types this type refers to.
    ///
    /// Called by [`TypeRegistry::register`] right after `Self` is inserted.
    fn register_dependencies(_registry: &mut TypeRegistry) -> Result<(), RegistryError> {
        Ok(())
    }
}
