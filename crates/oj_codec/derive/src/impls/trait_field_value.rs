use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::SerializableStruct;

/// Generate implementation codes for `FieldValue`.
///
/// A nested struct travels as `Value::Object`, and reaching it registers it.
pub(crate) fn impl_trait_field_value(data: &SerializableStruct) -> TokenStream {
    let oj_codec_path = data.oj_codec_path();
    let value_ = crate::path::value_(oj_codec_path);
    let registry_ = crate::path::registry_(oj_codec_path);
    let registry_error_ = crate::path::registry_error_(oj_codec_path);
    let real_ident = data.ident();

    quote! {
        impl #value_::FieldValue for #real_ident {
            fn to_value(&self) -> #value_::Value {
                #value_::Value::Object(::std::boxed::Box::new(::core::clone::Clone::clone(self)))
            }

            fn from_value(
                value: #value_::Value,
            ) -> ::core::result::Result<Self, #value_::ValueError> {
                value.into_object::<Self>()
            }

            fn register_dependencies(
                registry: &mut #registry_::TypeRegistry,
            ) -> ::core::result::Result<(), #registry_error_> {
                registry.register::<Self>()
            }
        }
    }
}
