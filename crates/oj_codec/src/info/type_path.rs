use core::any::TypeId;
use core::fmt;

use super::type_key::{derive_display_key, derive_key};

/// Static path information of a type.
///
/// Usually generated by `#[derive(Serializable)]`, which uses
/// `module_path!()` unless `#[objson(type_path = "...")]` overrides it.
///
/// # Examples
///
/// ```
/// use oj_codec::info::TypePath;
///
/// struct Marker;
///
/// impl TypePath for Marker {
///     fn type_path() -> &'static str { "pkg::models::Marker" }
///     fn type_ident() -> &'static str { "Marker" }
///     fn module_path() -> Option<&'static str> { Some("pkg::models") }
/// }
///
/// assert_eq!(Marker::type_ident(), "Marker");
/// ```
pub trait TypePath: 'static {
    /// Full path, such as `pkg::models::Marker`.
    fn type_path() -> &'static str;

    /// The bare name, such as `Marker`.
    fn type_ident() -> &'static str;

    /// The defining module, `None` for types without one.
    fn module_path() -> Option<&'static str> {
        None
    }
}

/// Object-safe counterpart of [`TypePath`].
pub trait DynamicTypePath {
    fn reflect_type_path(&self) -> &'static str;

    fn reflect_type_ident(&self) -> &'static str;

    fn reflect_module_path(&self) -> Option<&'static str>;

    /// The lowercase Type Key of the concrete type.
    fn reflect_type_key(&self) -> String {
        derive_key(self.reflect_module_path(), self.reflect_type_ident())
    }
}

impl<T: TypePath> DynamicTypePath for T {
    #[inline]
    fn reflect_type_path(&self) -> &'static str {
        T::type_path()
    }

    #[inline]
    fn reflect_type_ident(&self) -> &'static str {
        T::type_ident()
    }

    #[inline]
    fn reflect_module_path(&self) -> Option<&'static str> {
        T::module_path()
    }
}

/// Path information of a registered type, with its keys precomputed.
#[derive(Clone)]
pub struct TypePathTable {
    type_id: TypeId,
    type_path: &'static str,
    type_ident: &'static str,
    module_path: Option<&'static str>,
    key: String,
    display_key: String,
}

impl TypePathTable {
    pub fn of<T: TypePath>() -> Self {
        let module_path = T::module_path();
        let type_ident = T::type_ident();
        Self {
            type_id: TypeId::of::<T>(),
            type_path: T::type_path(),
            type_ident,
            module_path,
            key: derive_key(module_path, type_ident),
            display_key: derive_display_key(module_path, type_ident),
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn path(&self) -> &'static str {
        self.type_path
    }

    #[inline]
    pub fn ident(&self) -> &'static str {
        self.type_ident
    }

    #[inline]
    pub fn module_path(&self) -> Option<&'static str> {
        self.module_path
    }

    /// The lowercase Type Key written into documents.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The Type Key with the original casing kept.
    #[inline]
    pub fn display_key(&self) -> &str {
        &self.display_key
    }
}

impl fmt::Debug for TypePathTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypePathTable")
            .field("type_path", &self.type_path)
            .field("key", &self.key)
            .finish()
    }
}
