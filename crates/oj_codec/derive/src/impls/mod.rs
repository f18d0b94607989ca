use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::SerializableStruct;

// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod trait_field_value;
mod trait_get_type_meta;
mod trait_object;
mod trait_type_path;

// -----------------------------------------------------------------------------
// Entry

pub(crate) fn impl_all(data: &SerializableStruct) -> TokenStream {
    let type_path = trait_type_path::impl_trait_type_path(data);
    let object = trait_object::impl_trait_object(data);
    let get_type_meta = trait_get_type_meta::impl_trait_get_type_meta(data);
    let field_value = trait_field_value::impl_trait_field_value(data);
    let auto_register = auto_register::get_auto_register_impl(data);

    quote! {
        #type_path

        #object

        #get_type_meta

        #field_value

        #auto_register
    }
}
