//! The JSON document form: attribute tags, [`Encoder`] and [`Decoder`].

// -----------------------------------------------------------------------------
// Modules

mod decoder;
mod encoder;
mod tag;

// -----------------------------------------------------------------------------
// Exports

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use tag::{AttributeTag, CollectionKind, parse_attribute_key};

// -----------------------------------------------------------------------------
// Constants

/// Separates the segments of a tagged attribute key.
pub const DELIMITER: &str = "::::";

/// Stands in for a value whose textual representation is unavailable.
pub const UNSERIALIZABLE: &str = "UNSERIALIZABLE";

/// Timestamp layout; the fraction is written only when non-zero.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Nesting limit used when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 256;
