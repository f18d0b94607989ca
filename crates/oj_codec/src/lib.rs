//! A JSON codec that keeps the concrete type of every registered object.
//!
//! Each registered struct is written as a single-key wrapper
//! `{"<type key>": {<attributes>}}`. Attributes whose values would lose
//! their kind in plain JSON (sets, tuples, bytes, paths, timestamps,
//! callables, unrepresentable values) carry a tag in their key, so that
//! decoding restores the exact variant.
//!
//! ```
//! use oj_codec::{Codec, Serializable};
//!
//! #[derive(Serializable, Clone, PartialEq, Debug)]
//! #[objson(type_path = "pkg::Inner")]
//! struct Inner {
//!     name: String,
//! }
//!
//! #[derive(Serializable, Clone, PartialEq, Debug)]
//! #[objson(type_path = "pkg::Outer")]
//! struct Outer {
//!     tags: std::collections::BTreeSet<String>,
//!     child: Inner,
//! }
//!
//! let codec = Codec::of::<Outer>().unwrap();
//! let outer = Outer {
//!     tags: ["a".to_owned()].into(),
//!     child: Inner { name: "n".to_owned() },
//! };
//!
//! let json = outer.serialize(&codec);
//! assert_eq!(
//!     json,
//!     serde_json::json!({
//!         "pkg.outer": {
//!             "collection::::set::::tags": ["a"],
//!             "child": { "pkg.inner": { "name": "n" } }
//!         }
//!     })
//! );
//!
//! let mut copy = Outer {
//!     tags: Default::default(),
//!     child: Inner { name: String::new() },
//! };
//! copy.deserialize(&codec, &json).unwrap();
//! assert_eq!(copy, outer);
//! ```

// Allows the derive output, which names `::oj_codec`, to resolve inside this crate.
extern crate self as oj_codec;

// -----------------------------------------------------------------------------
// Modules

mod codec;
mod error;
mod object;

pub mod filter;
pub mod info;
pub mod json;
pub mod persist;
pub mod registry;
pub mod value;

// -----------------------------------------------------------------------------
// Top-level exports

pub use codec::{Codec, CodecConfig, Serializable};
pub use error::{CodecError, RegistryError};
pub use object::Object;

pub use oj_codec_derive::Serializable;

// -----------------------------------------------------------------------------
// Prelude

pub mod prelude {
    pub use crate::info::TypePath;
    pub use crate::registry::{GetTypeMeta, TypeRegistry};
    pub use crate::value::{FieldValue, Value};
    pub use crate::{Codec, CodecConfig, CodecError, Object, Serializable};
}

// -----------------------------------------------------------------------------
// Macro exports

#[doc(hidden)]
pub mod __macro_exports;
