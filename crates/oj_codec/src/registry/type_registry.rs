use core::any::TypeId;

use oj_utils::TypeIdMap;
use oj_utils::hash::{FixedHashState, HashMap};

use super::{GetTypeMeta, TypeMeta};
use crate::RegistryError;
use crate::value::FunctionRef;

// -----------------------------------------------------------------------------
// TypeRegistry

/// The set of types and functions a codec can reconstruct.
///
/// Types are looked up by [`TypeId`] when encoding and by Type Key when
/// decoding. Every registered type must have a distinct key.
///
/// # Example
///
/// ```
/// use oj_codec::registry::TypeRegistry;
///
/// #[derive(oj_codec::Serializable, Clone, PartialEq, Debug)]
/// #[objson(type_path = "shop::Item")]
/// struct Item { sku: String }
///
/// #[derive(oj_codec::Serializable, Clone, PartialEq, Debug)]
/// #[objson(type_path = "shop::Cart")]
/// struct Cart { items: Vec<Item> }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Cart>().unwrap();
///
/// // `Item` is reachable from `Cart`, so it is registered as well.
/// assert!(registry.get_with_key("shop.item").is_some());
/// ```
pub struct TypeRegistry {
    type_meta_table: TypeIdMap<TypeMeta>,
    key_to_id: HashMap<String, TypeId>,
    functions: HashMap<String, FunctionRef>,
}

impl Default for TypeRegistry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[inline]
    pub const fn new() -> Self {
        Self {
            type_meta_table: TypeIdMap::new(),
            key_to_id: HashMap::with_hasher(FixedHashState),
            functions: HashMap::with_hasher(FixedHashState),
        }
    }

    /// Registers `T` and every type reachable through its fields.
    ///
    /// Registering a type twice is a no-op. A type is marked as registered
    /// before its dependencies are walked, so shared and recursive
    /// references terminate.
    pub fn register<T: GetTypeMeta>(&mut self) -> Result<(), RegistryError> {
        if self.type_meta_table.contains_type::<T>() {
            return Ok(());
        }
        self.add_type_meta(T::get_type_meta())?;
        <T as GetTypeMeta>::register_dependencies(self)
    }

    /// Inserts a descriptor, returning `false` if its type was present.
    ///
    /// Fails when another type already holds the same Type Key.
    pub fn add_type_meta(&mut self, meta: TypeMeta) -> Result<bool, RegistryError> {
        let type_id = meta.type_id();
        if self.type_meta_table.contains(&type_id) {
            return Ok(false);
        }
        if let Some(existing) = self.get_with_key(meta.key()) {
            return Err(RegistryError::KeyCollision {
                key: meta.key().to_owned(),
                existing: existing.type_path(),
                incoming: meta.type_path(),
            });
        }

        log::debug!("registered `{}` as `{}`", meta.type_path(), meta.key());
        self.key_to_id.insert(meta.key().to_owned(), type_id);
        self.type_meta_table.try_insert(type_id, || meta);
        Ok(true)
    }

    /// Registers a function so `callable` attributes naming it can be
    /// resolved.
    pub fn register_function(&mut self, function: FunctionRef) -> Result<(), RegistryError> {
        let key = function.key();
        if self.functions.contains_key(&key) {
            return Err(RegistryError::FunctionCollision { key });
        }
        log::debug!("registered callable `{key}`");
        self.functions.insert(key, function);
        Ok(())
    }

    /// Registers every type marked `#[objson(auto_register)]`.
    ///
    /// Returns `false` when the `auto_register` feature is disabled.
    pub fn auto_register(&mut self) -> Result<bool, RegistryError> {
        #[cfg(feature = "auto_register")]
        {
            crate::__macro_exports::auto_register::register_types(self)?;
            Ok(true)
        }
        #[cfg(not(feature = "auto_register"))]
        {
            Ok(false)
        }
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_meta_table.contains(&type_id)
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeMeta> {
        self.type_meta_table.get(&type_id)
    }

    /// Looks a type up by its lowercase Type Key.
    pub fn get_with_key(&self, key: &str) -> Option<&TypeMeta> {
        self.key_to_id
            .get(key)
            .and_then(|type_id| self.type_meta_table.get(type_id))
    }

    /// Looks a function up by its lowercase key.
    #[inline]
    pub fn get_function(&self, key: &str) -> Option<&FunctionRef> {
        self.functions.get(key)
    }

    /// Visits all type descriptors in arbitrary order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeMeta> {
        self.type_meta_table.values()
    }

    /// Number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.type_meta_table.len()
    }
}

#[cfg(test)]
mod tests {
    use super::TypeRegistry;
    use crate::RegistryError;
    use crate::value::{FunctionRef, Value};

    mod a {
        #[derive(crate::Serializable, Clone, PartialEq, Debug)]
        #[objson(type_path = "clash::Node")]
        pub struct Node {
            pub id: u32,
        }
    }

    mod b {
        #[derive(crate::Serializable, Clone, PartialEq, Debug)]
        #[objson(type_path = "Clash::NODE")]
        pub struct Node {
            pub id: u32,
        }
    }

    #[derive(crate::Serializable, Clone, PartialEq, Debug)]
    #[objson(type_path = "graph::Leaf")]
    struct Leaf {
        id: u32,
    }

    #[derive(crate::Serializable, Clone, PartialEq, Debug)]
    #[objson(type_path = "graph::Left")]
    struct Left {
        leaf: Leaf,
    }

    #[derive(crate::Serializable, Clone, PartialEq, Debug)]
    #[objson(type_path = "graph::Right")]
    struct Right {
        leaf: Option<Leaf>,
    }

    #[derive(crate::Serializable, Clone, PartialEq, Debug)]
    #[objson(type_path = "graph::Root")]
    struct Root {
        left: Left,
        right: Vec<Right>,
    }

    #[derive(crate::Serializable, Clone, PartialEq, Debug)]
    #[objson(type_path = "graph::Tree")]
    struct Tree {
        children: Vec<Tree>,
    }

    #[test]
    fn diamond_registers_each_type_once() {
        let mut registry = TypeRegistry::new();
        registry.register::<Root>().unwrap();
        assert_eq!(registry.len(), 4);
        for key in ["graph.root", "graph.left", "graph.right", "graph.leaf"] {
            assert!(registry.get_with_key(key).is_some(), "{key}");
        }
        registry.register::<Left>().unwrap();
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn recursive_type_terminates() {
        let mut registry = TypeRegistry::new();
        registry.register::<Tree>().unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn key_collision() {
        let mut registry = TypeRegistry::new();
        registry.register::<a::Node>().unwrap();
        let err = registry.register::<b::Node>().unwrap_err();
        assert_eq!(
            err,
            RegistryError::KeyCollision {
                key: "clash.node".to_owned(),
                existing: "clash::Node",
                incoming: "Clash::NODE",
            }
        );
    }

    #[test]
    fn function_collision() {
        fn f(_: &[Value]) -> Result<Value, crate::CodecError> {
            Ok(Value::Null)
        }
        let mut registry = TypeRegistry::new();
        registry.register_function(FunctionRef::function("ops", "f", f)).unwrap();
        assert!(registry.get_function("ops.f").is_some());
        assert!(matches!(
            registry.register_function(FunctionRef::function("ops", "F", f)),
            Err(RegistryError::FunctionCollision { .. })
        ));
    }
}
