//! Paths of the items referenced by generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// The path under which the caller reaches `oj_codec`.
///
/// Resolved from the caller's `Cargo.toml`; see `oj_macro_utils::Manifest`.
pub(crate) fn oj_codec() -> syn::Path {
    oj_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("oj_codec"))
}

#[inline(always)]
pub(crate) fn type_path_(oj_codec_path: &syn::Path) -> TokenStream {
    quote! { #oj_codec_path::info::TypePath }
}

#[inline(always)]
pub(crate) fn object_(oj_codec_path: &syn::Path) -> TokenStream {
    quote! { #oj_codec_path::Object }
}

#[inline(always)]
pub(crate) fn registry_(oj_codec_path: &syn::Path) -> TokenStream {
    quote! { #oj_codec_path::registry }
}

#[inline(always)]
pub(crate) fn value_(oj_codec_path: &syn::Path) -> TokenStream {
    quote! { #oj_codec_path::value }
}

#[inline(always)]
pub(crate) fn registry_error_(oj_codec_path: &syn::Path) -> TokenStream {
    quote! { #oj_codec_path::RegistryError }
}

#[inline(always)]
pub(crate) fn codec_error_(oj_codec_path: &syn::Path) -> TokenStream {
    quote! { #oj_codec_path::CodecError }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(oj_codec_path: &syn::Path) -> TokenStream {
    quote! { #oj_codec_path::__macro_exports::auto_register }
}
