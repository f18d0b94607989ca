use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::SerializableStruct;

/// `(type_path, type_ident, module_path)` expressions.
fn path_parts(data: &SerializableStruct) -> (TokenStream, TokenStream, TokenStream) {
    match &data.attrs().type_path {
        Some(lit) => {
            let full = lit.value();
            let (module, ident) = match full.rsplit_once("::") {
                Some((module, ident)) => (Some(module.to_owned()), ident.to_owned()),
                None => (None, full.clone()),
            };
            let module = match module {
                Some(module) => quote! { ::core::option::Option::Some(#module) },
                None => quote! { ::core::option::Option::None },
            };
            (quote! { #full }, quote! { #ident }, module)
        }
        None => {
            let ident = data.ident().to_string();
            (
                quote! { ::core::concat!(::core::module_path!(), "::", #ident) },
                quote! { #ident },
                quote! { ::core::option::Option::Some(::core::module_path!()) },
            )
        }
    }
}

pub(crate) fn impl_trait_type_path(data: &SerializableStruct) -> TokenStream {
    let trait_type_path_ = crate::path::type_path_(data.oj_codec_path());
    let real_ident = data.ident();
    let (type_path, type_ident, module_path) = path_parts(data);

    quote! {
        impl #trait_type_path_ for #real_ident {
            #[inline]
            fn type_path() -> &'static str {
                #type_path
            }

            #[inline]
            fn type_ident() -> &'static str {
                #type_ident
            }

            #[inline]
            fn module_path() -> ::core::option::Option<&'static str> {
                #module_path
            }
        }
    }
}
