use crate::CodecError;
use crate::value::CallableKind;

use super::{DELIMITER, UNSERIALIZABLE};

/// The container kinds distinguished by a `collection` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Dict,
    List,
    Set,
    Tuple,
    Bytes,
    ByteArray,
}

impl CollectionKind {
    pub const fn name(self) -> &'static str {
        match self {
            CollectionKind::Dict => "dict",
            CollectionKind::List => "list",
            CollectionKind::Set => "set",
            CollectionKind::Tuple => "tuple",
            CollectionKind::Bytes => "bytes",
            CollectionKind::ByteArray => "bytearray",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "dict" => CollectionKind::Dict,
            "list" => CollectionKind::List,
            "set" => CollectionKind::Set,
            "tuple" => CollectionKind::Tuple,
            "bytes" => CollectionKind::Bytes,
            "bytearray" => CollectionKind::ByteArray,
            _ => return None,
        })
    }
}

/// The tag carried by an attribute key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeTag {
    /// No tag: JSON primitives and nested registered objects.
    Plain,
    Collection(CollectionKind),
    Path,
    Callable(CallableKind),
    DateTime,
    /// Textual representation of a value of the given Type Key.
    Repr(String),
    /// The marker for a value of the given Type Key with no representation.
    Unserializable(String),
}

impl AttributeTag {
    /// Builds the key for attribute `name`.
    ///
    /// ```
    /// use oj_codec::json::{AttributeTag, CollectionKind};
    ///
    /// assert_eq!(AttributeTag::Plain.apply("n"), "n");
    /// assert_eq!(AttributeTag::Path.apply("home"), "path::::home");
    /// assert_eq!(
    ///     AttributeTag::Collection(CollectionKind::Set).apply("ids"),
    ///     "collection::::set::::ids"
    /// );
    /// ```
    pub fn apply(&self, name: &str) -> String {
        match self {
            AttributeTag::Plain => name.to_owned(),
            AttributeTag::Collection(kind) => {
                format!("collection{DELIMITER}{}{DELIMITER}{name}", kind.name())
            }
            AttributeTag::Path => format!("path{DELIMITER}{name}"),
            AttributeTag::Callable(kind) => {
                format!("callable{DELIMITER}{}{DELIMITER}{name}", kind.name())
            }
            AttributeTag::DateTime => format!("datetime{DELIMITER}{name}"),
            AttributeTag::Repr(type_key) => format!("repr{DELIMITER}{type_key}{DELIMITER}{name}"),
            AttributeTag::Unserializable(type_key) => {
                format!("{UNSERIALIZABLE}{DELIMITER}{type_key}{DELIMITER}{name}")
            }
        }
    }
}

fn malformed(key: &str, reason: &'static str) -> CodecError {
    CodecError::MalformedTag {
        key: key.to_owned(),
        reason,
    }
}

/// Splits an attribute key into its tag and the bare attribute name.
///
/// ```
/// use oj_codec::json::{AttributeTag, parse_attribute_key};
///
/// let (tag, name) = parse_attribute_key("datetime::::created").unwrap();
/// assert_eq!((tag, name), (AttributeTag::DateTime, "created"));
/// assert!(parse_attribute_key("a::::b::::c::::d").is_err());
/// ```
pub fn parse_attribute_key(key: &str) -> Result<(AttributeTag, &str), CodecError> {
    let segments: Vec<&str> = key.split(DELIMITER).collect();
    let tag = match segments.as_slice() {
        [name] => return Ok((AttributeTag::Plain, *name)),
        [type_name, _] => match *type_name {
            "path" => AttributeTag::Path,
            "datetime" => AttributeTag::DateTime,
            _ => return Err(malformed(key, "unknown single-segment tag")),
        },
        [category, type_name, _] => match *category {
            "collection" => CollectionKind::from_name(type_name)
                .map(AttributeTag::Collection)
                .ok_or_else(|| malformed(key, "unknown collection kind"))?,
            "callable" => CallableKind::from_name(type_name)
                .map(AttributeTag::Callable)
                .ok_or_else(|| malformed(key, "unknown callable kind"))?,
            "repr" => AttributeTag::Repr((*type_name).to_owned()),
            UNSERIALIZABLE => AttributeTag::Unserializable((*type_name).to_owned()),
            _ => return Err(malformed(key, "unknown tag category")),
        },
        _ => return Err(malformed(key, "too many delimiters")),
    };
    match segments.last() {
        Some(name) if !name.is_empty() => Ok((tag, *name)),
        _ => Err(malformed(key, "missing attribute name")),
    }
}

#[cfg(test)]
mod tests {
    use super::{AttributeTag, CollectionKind, parse_attribute_key};
    use crate::CodecError;
    use crate::value::CallableKind;

    #[test]
    fn every_tag_parses_back() {
        let tags = [
            AttributeTag::Plain,
            AttributeTag::Collection(CollectionKind::ByteArray),
            AttributeTag::Path,
            AttributeTag::Callable(CallableKind::Method),
            AttributeTag::DateTime,
            AttributeTag::Repr("decimal".to_owned()),
            AttributeTag::Unserializable("socket".to_owned()),
        ];
        for tag in tags {
            let key = tag.apply("field");
            assert_eq!(parse_attribute_key(&key).unwrap(), (tag, "field"));
        }
    }

    #[test]
    fn unserializable_key_layout() {
        let tag = AttributeTag::Unserializable("pkg.handle".to_owned());
        assert_eq!(tag.apply("h"), "UNSERIALIZABLE::::pkg.handle::::h");
    }

    #[test]
    fn rejects_unknown_shapes() {
        for key in [
            "a::::b::::c::::d",
            "colour::::x",
            "collection::::heap::::x",
            "callable::::lambda::::x",
            "frozen::::set::::x",
            "path::::",
        ] {
            assert!(
                matches!(parse_attribute_key(key), Err(CodecError::MalformedTag { .. })),
                "{key}"
            );
        }
    }
}
