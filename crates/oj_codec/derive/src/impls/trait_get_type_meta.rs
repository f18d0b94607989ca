use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::SerializableStruct;

/// Generate implementation codes for `GetTypeMeta`.
///
/// Each active field becomes a `FieldInfo` and a constructor parameter,
/// required unless marked `default`. Skipped fields are initialized with
/// `Default::default()`.
pub(crate) fn impl_trait_get_type_meta(data: &SerializableStruct) -> TokenStream {
    let oj_codec_path = data.oj_codec_path();
    let registry_ = crate::path::registry_(oj_codec_path);
    let value_ = crate::path::value_(oj_codec_path);
    let object_ = crate::path::object_(oj_codec_path);
    let registry_error_ = crate::path::registry_error_(oj_codec_path);
    let codec_error_ = crate::path::codec_error_(oj_codec_path);
    let real_ident = data.ident();

    let field_infos = data.active_fields().map(|field| {
        let ident = field.ident;
        let ty = field.ty;
        let name = field.name();
        quote! {
            .with_field(#registry_::FieldInfo::new::<Self, #ty>(
                #name,
                |this| &this.#ident,
                |this| &mut this.#ident,
            ))
        }
    });

    let params = data.active_fields().map(|field| {
        let name = field.name();
        if field.attrs.default {
            quote! { .optional(#name) }
        } else {
            quote! { .required(#name) }
        }
    });

    let inits = data.fields().iter().map(|field| {
        let ident = field.ident;
        let ty = field.ty;
        let name = field.name();
        if field.attrs.skip {
            quote! { #ident: ::core::default::Default::default() }
        } else if field.attrs.default {
            quote! { #ident: args.take_or_default::<#ty>(#name)? }
        } else {
            quote! { #ident: args.take::<#ty>(#name)? }
        }
    });

    let dependencies = data.active_fields().map(|field| {
        let ty = field.ty;
        quote! {
            <#ty as #value_::FieldValue>::register_dependencies(registry)?;
        }
    });

    quote! {
        impl #registry_::GetTypeMeta for #real_ident {
            fn get_type_meta() -> #registry_::TypeMeta {
                #registry_::TypeMeta::of::<Self>()
                    #(#field_infos)*
                    .with_constructor(
                        #registry_::Constructor::new(
                            |args: &mut #registry_::Arguments| -> ::core::result::Result<
                                ::std::boxed::Box<dyn #object_>,
                                #codec_error_,
                            > {
                                ::core::result::Result::Ok(::std::boxed::Box::new(Self {
                                    #(#inits,)*
                                }))
                            },
                        )
                        #(#params)*
                    )
            }

            fn register_dependencies(
                registry: &mut #registry_::TypeRegistry,
            ) -> ::core::result::Result<(), #registry_error_> {
                #(#dependencies)*
                ::core::result::Result::Ok(())
            }
        }
    }
}
