use proc_macro2::Span;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, GenericArgument, Ident, LitStr, PathArguments, Type};

use crate::OBJSON_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// Attributes

/// Type level `#[objson(...)]` options.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub type_path: Option<LitStr>,
    pub auto_register: Option<Span>,
}

impl TypeAttributes {
    fn parse(attrs: &[syn::Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident(OBJSON_ATTRIBUTE_NAME)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("type_path") {
                    let lit: LitStr = meta.value()?.parse()?;
                    if lit.value().trim().is_empty() {
                        return Err(syn::Error::new(lit.span(), "`type_path` must not be empty"));
                    }
                    result.type_path = Some(lit);
                    Ok(())
                } else if meta.path.is_ident("auto_register") {
                    result.auto_register = Some(meta.path.span());
                    Ok(())
                } else {
                    Err(meta.error("unsupported attribute, expected `type_path` or `auto_register`"))
                }
            })?;
        }
        Ok(result)
    }
}

/// Field level `#[objson(...)]` options.
#[derive(Default, Clone, Copy)]
pub(crate) struct FieldAttributes {
    pub skip: bool,
    pub default: bool,
}

impl FieldAttributes {
    fn parse(attrs: &[syn::Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident(OBJSON_ATTRIBUTE_NAME)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    result.skip = true;
                    Ok(())
                } else if meta.path.is_ident("default") {
                    result.default = true;
                    Ok(())
                } else {
                    Err(meta.error("unsupported attribute, expected `skip` or `default`"))
                }
            })?;
            if result.skip && result.default {
                return Err(syn::Error::new(attr.span(), "`skip` already implies `default`"));
            }
        }
        Ok(result)
    }
}

// -----------------------------------------------------------------------------
// Field types

/// Values whose tag only exists on the attribute itself. Nested inside a
/// collection they are written as bare text and cannot be read back.
const ATTRIBUTE_ONLY_TYPES: &[&str] = &["FunctionRef", "OpaqueValue"];

/// Rejects `FunctionRef` and `OpaqueValue` below a collection or tuple.
///
/// `Option` and `Box` are transparent, so `Option<FunctionRef>` stays valid.
pub(crate) fn check_field_type(ty: &Type, nested: bool) -> syn::Result<()> {
    match ty {
        Type::Paren(inner) => check_field_type(&inner.elem, nested),
        Type::Group(inner) => check_field_type(&inner.elem, nested),
        Type::Tuple(tuple) => tuple
            .elems
            .iter()
            .try_for_each(|elem| check_field_type(elem, true)),
        Type::Array(array) => check_field_type(&array.elem, true),
        Type::Path(path) => {
            let Some(last) = path.path.segments.last() else {
                return Ok(());
            };
            if nested && ATTRIBUTE_ONLY_TYPES.iter().any(|name| last.ident == name) {
                return Err(syn::Error::new(
                    ty.span(),
                    format!(
                        "`{}` can only be stored directly in a field, not inside a collection",
                        last.ident
                    ),
                ));
            }
            let transparent = last.ident == "Option" || last.ident == "Box";
            let PathArguments::AngleBracketed(args) = &last.arguments else {
                return Ok(());
            };
            args.args.iter().try_for_each(|arg| match arg {
                GenericArgument::Type(inner) => check_field_type(inner, nested || !transparent),
                _ => Ok(()),
            })
        }
        _ => Ok(()),
    }
}

// -----------------------------------------------------------------------------
// SerializableStruct

pub(crate) struct SerializableField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub attrs: FieldAttributes,
}

impl SerializableField<'_> {
    /// The attribute name written into documents.
    pub fn name(&self) -> String {
        self.ident.unraw().to_string()
    }
}

pub(crate) struct SerializableStruct<'a> {
    ident: &'a Ident,
    attrs: TypeAttributes,
    fields: Vec<SerializableField<'a>>,
    oj_codec_path: syn::Path,
}

impl<'a> SerializableStruct<'a> {
    pub fn from_ast(ast: &'a DeriveInput) -> syn::Result<Self> {
        if !ast.generics.params.is_empty() {
            return Err(syn::Error::new(
                ast.generics.span(),
                "`Serializable` does not support generic types",
            ));
        }

        let named = match &ast.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => named,
                _ => {
                    return Err(syn::Error::new(
                        ast.ident.span(),
                        "`Serializable` requires a struct with named fields",
                    ));
                }
            },
            _ => {
                return Err(syn::Error::new(
                    ast.ident.span(),
                    "`Serializable` can only be derived for structs",
                ));
            }
        };

        let fields = named
            .named
            .iter()
            .map(|field| {
                let attrs = FieldAttributes::parse(&field.attrs)?;
                if !attrs.skip {
                    check_field_type(&field.ty, false)?;
                }
                Ok(SerializableField {
                    ident: field.ident.as_ref().ok_or_else(|| {
                        syn::Error::new(field.span(), "expected a named field")
                    })?,
                    ty: &field.ty,
                    attrs,
                })
            })
            .collect::<syn::Result<Vec<_>>>()?;

        Ok(Self {
            ident: &ast.ident,
            attrs: TypeAttributes::parse(&ast.attrs)?,
            fields,
            oj_codec_path: crate::path::oj_codec(),
        })
    }

    #[inline]
    pub fn ident(&self) -> &Ident {
        self.ident
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn oj_codec_path(&self) -> &syn::Path {
        &self.oj_codec_path
    }

    /// All fields, skipped ones included.
    #[inline]
    pub fn fields(&self) -> &[SerializableField<'a>] {
        &self.fields
    }

    /// Fields that are written into documents.
    pub fn active_fields(&self) -> impl Iterator<Item = &SerializableField<'a>> {
        self.fields.iter().filter(|f| !f.attrs.skip)
    }
}

#[cfg(test)]
mod tests {
    use syn::{Type, parse_quote};

    use super::check_field_type;

    fn accepts(ty: Type) -> bool {
        check_field_type(&ty, false).is_ok()
    }

    #[test]
    fn attribute_only_types() {
        assert!(accepts(parse_quote!(FunctionRef)));
        assert!(accepts(parse_quote!(Option<oj_codec::value::OpaqueValue>)));
        assert!(accepts(parse_quote!(Box<FunctionRef>)));
        assert!(accepts(parse_quote!(Vec<Bytes>)));

        assert!(!accepts(parse_quote!(Vec<FunctionRef>)));
        assert!(!accepts(parse_quote!(BTreeMap<String, OpaqueValue>)));
        assert!(!accepts(parse_quote!((i64, FunctionRef))));
        assert!(!accepts(parse_quote!(Option<Vec<Option<FunctionRef>>>)));
    }
}
