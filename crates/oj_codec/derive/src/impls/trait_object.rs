use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::SerializableStruct;

pub(crate) fn impl_trait_object(data: &SerializableStruct) -> TokenStream {
    let object_ = crate::path::object_(data.oj_codec_path());
    let real_ident = data.ident();

    quote! {
        impl #object_ for #real_ident {
            #[inline]
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            #[inline]
            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }

            #[inline]
            fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::core::any::Any> {
                self
            }

            #[inline]
            fn clone_object(&self) -> ::std::boxed::Box<dyn #object_> {
                ::std::boxed::Box::new(::core::clone::Clone::clone(self))
            }

            fn object_eq(&self, other: &dyn #object_) -> bool {
                <dyn ::core::any::Any>::downcast_ref::<Self>(#object_::as_any(other))
                    .is_some_and(|other| ::core::cmp::PartialEq::eq(self, other))
            }
        }
    }
}
