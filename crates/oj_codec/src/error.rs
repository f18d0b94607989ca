use thiserror::Error;

use crate::value::ValueError;

/// An error raised while building the type registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("type key `{key}` is claimed by both `{existing}` and `{incoming}`")]
    KeyCollision {
        key: String,
        existing: &'static str,
        incoming: &'static str,
    },
    #[error("callable `{key}` is already registered")]
    FunctionCollision { key: String },
}

/// An error raised while configuring a codec or decoding a document.
///
/// Encoding never fails: values without a JSON form fall back to their
/// textual representation or the `UNSERIALIZABLE` marker.
#[derive(Debug, Error)]
pub enum CodecError {
    /// An attribute key whose tag cannot be interpreted.
    #[error("malformed attribute key `{key}`: {reason}")]
    MalformedTag { key: String, reason: &'static str },

    /// A `callable::::method` tag; bound methods are never reconstructed.
    #[error("attribute `{key}` holds a bound method, which cannot be reconstructed")]
    UnsupportedCallable { key: String },

    #[error("callable `{path}` is not registered")]
    UnresolvedCallable { path: String },

    /// A tagged attribute whose JSON value has the wrong shape for its tag.
    #[error("attribute `{key}` expected {expected}, found {found}")]
    InvalidTaggedValue {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("attribute `{key}` is not valid base64")]
    InvalidBase64 {
        key: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("attribute `{key}` is not a valid timestamp")]
    InvalidTimestamp {
        key: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Required constructor parameters left unresolved after applying
    /// decoded attributes and fallback extras.
    #[error("cannot construct `{type_path}`, missing required parameter(s): {}", .params.join(", "))]
    MissingParameters {
        type_path: &'static str,
        params: Vec<String>,
    },

    #[error("`{type_path}` has no constructor and can only be decoded in place")]
    NoConstructor { type_path: &'static str },

    #[error("field `{field}` of `{type_path}`: {source}")]
    Field {
        type_path: &'static str,
        field: String,
        #[source]
        source: ValueError,
    },

    #[error("invalid attribute pattern `{pattern}`")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The document decoded to something other than the requested type.
    #[error("expected `{expected}`, the document holds {found}")]
    TargetMismatch { expected: String, found: String },

    #[error("document nesting exceeds the limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
