use proc_macro2::TokenStream;

use crate::derive_data::SerializableStruct;

/// Generate `auto_register` implementation
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(data: &SerializableStruct) -> TokenStream {
    use quote::quote_spanned;

    let Some(span) = data.attrs().auto_register else {
        return TokenStream::new();
    };
    let auto_register_ = crate::path::auto_register_(data.oj_codec_path());
    let real_ident = data.ident();

    quote_spanned! { span =>
        #auto_register_::inventory::submit! {
            #auto_register_::AutoRegisterFn(#auto_register_::register::<#real_ident>)
        }
    }
}

/// Generate `auto_register` implementation
#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &SerializableStruct) -> TokenStream {
    TokenStream::new()
}
