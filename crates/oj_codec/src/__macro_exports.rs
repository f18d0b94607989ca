//! Items referenced by code generated from `#[derive(Serializable)]`.

#[cfg(feature = "auto_register")]
pub mod auto_register {
    use crate::RegistryError;
    use crate::registry::{GetTypeMeta, TypeRegistry};

    pub use inventory;

    /// A registration hook submitted by `#[objson(auto_register)]`.
    pub struct AutoRegisterFn(pub fn(&mut TypeRegistry) -> Result<(), RegistryError>);

    inventory::collect!(AutoRegisterFn);

    /// Registers `T`; used as the function pointer of [`AutoRegisterFn`].
    pub fn register<T: GetTypeMeta>(registry: &mut TypeRegistry) -> Result<(), RegistryError> {
        registry.register::<T>()
    }

    pub(crate) fn register_types(registry: &mut TypeRegistry) -> Result<(), RegistryError> {
        for hook in inventory::iter::<AutoRegisterFn> {
            (hook.0)(registry)?;
        }
        Ok(())
    }
}
