//! Type Key derivation.
//!
//! A Type Key is the module path joined to the type name with `.`, in
//! lowercase. Types living in the standard crates carry no namespace.

/// Crates whose types are keyed by bare name.
pub const BUILTIN_CRATES: &[&str] = &["core", "alloc", "std"];

/// Returns `true` if `module_path` belongs to one of [`BUILTIN_CRATES`].
pub fn is_builtin(module_path: &str) -> bool {
    let root = module_path.split("::").next().unwrap_or(module_path);
    BUILTIN_CRATES.contains(&root)
}

fn join(module_path: Option<&str>, name: &str) -> String {
    match module_path {
        Some(module) if !module.is_empty() && !is_builtin(module) => {
            let mut key = module.replace("::", ".");
            key.push('.');
            key.push_str(name);
            key
        }
        _ => name.to_owned(),
    }
}

/// Derives the lowercase Type Key.
///
/// # Examples
///
/// ```
/// use oj_codec::info::derive_key;
///
/// assert_eq!(derive_key(Some("pkg::models"), "Outer"), "pkg.models.outer");
/// assert_eq!(derive_key(Some("alloc::string"), "String"), "string");
/// assert_eq!(derive_key(None, "i64"), "i64");
/// ```
pub fn derive_key(module_path: Option<&str>, name: &str) -> String {
    join(module_path, name).to_lowercase()
}

/// Derives the Type Key with the original casing.
#[inline]
pub fn derive_display_key(module_path: Option<&str>, name: &str) -> String {
    join(module_path, name)
}

/// Splits a [`core::any::type_name`] into its module and bare name.
///
/// Generic arguments are dropped; references, slices and tuples have no
/// module.
///
/// ```
/// use oj_codec::info::split_type_name;
///
/// assert_eq!(split_type_name("alloc::vec::Vec<i32>"), (Some("alloc::vec"), "Vec"));
/// assert_eq!(split_type_name("u8"), (None, "u8"));
/// ```
pub fn split_type_name(full: &str) -> (Option<&str>, &str) {
    if full.starts_with(['(', '[', '&', '*']) {
        return (None, full);
    }
    let plain = full.split_once('<').map_or(full, |(head, _)| head);
    match plain.rsplit_once("::") {
        Some((module, name)) => (Some(module), name),
        None => (None, plain),
    }
}

/// Derives the Type Key of any type from its compiler-provided name.
pub fn key_of<T: ?Sized>() -> String {
    let (module, name) = split_type_name(core::any::type_name::<T>());
    derive_key(module, name)
}

#[cfg(test)]
mod tests {
    use super::{derive_display_key, derive_key, is_builtin, key_of};

    #[test]
    fn nested_module() {
        assert_eq!(derive_key(Some("pkg"), "Outer"), "pkg.outer");
        assert_eq!(derive_display_key(Some("pkg::deep"), "Outer"), "pkg.deep.Outer");
    }

    #[test]
    fn builtin_namespace_omitted() {
        assert!(is_builtin("std::collections::hash::map"));
        assert!(!is_builtin("stdx::map"));
        assert_eq!(key_of::<String>(), "string");
        assert_eq!(key_of::<Vec<u8>>(), "vec");
        assert_eq!(key_of::<f64>(), "f64");
    }

    #[test]
    fn local_types_keep_namespace() {
        struct Probe;
        assert!(key_of::<Probe>().starts_with("oj_codec.info."));
        assert!(key_of::<Probe>().ends_with(".probe"));
        assert_eq!(key_of::<std::path::PathBuf>(), "pathbuf");
    }
}
