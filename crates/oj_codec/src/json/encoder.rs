use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Number, Value as JsonValue};

use super::{AttributeTag, CollectionKind, DATETIME_FORMAT, UNSERIALIZABLE};
use crate::Object;
use crate::filter::AttributeFilter;
use crate::info::{DynamicTypePath, key_of};
use crate::registry::{TypeMeta, TypeRegistry};
use crate::value::{OpaqueValue, Value};

/// Writes [`Value`]s and objects as JSON documents.
///
/// Encoding is total: anything without a JSON form is written as its
/// textual representation, or as [`UNSERIALIZABLE`].
#[derive(Clone, Copy)]
pub struct Encoder<'a> {
    registry: &'a TypeRegistry,
    filter: &'a AttributeFilter,
}

fn portable_path(path: &Path) -> String {
    let text = path.to_string_lossy();
    if cfg!(windows) {
        text.replace('\\', "/")
    } else {
        text.into_owned()
    }
}

fn opaque_text(opaque: &OpaqueValue) -> JsonValue {
    JsonValue::String(opaque.repr().unwrap_or(UNSERIALIZABLE).to_owned())
}

impl<'a> Encoder<'a> {
    #[inline]
    pub fn new(registry: &'a TypeRegistry, filter: &'a AttributeFilter) -> Self {
        Self { registry, filter }
    }

    fn meta_of(&self, object: &dyn Object) -> Option<&'a TypeMeta> {
        self.registry.get(object.object_type_id())
    }

    /// The tag an attribute holding `value` is written under.
    pub fn attribute_tag(&self, value: &Value) -> AttributeTag {
        match value {
            Value::Null
            | Value::Bool(_)
            | Value::Int(_)
            | Value::UInt(_)
            | Value::String(_) => AttributeTag::Plain,
            Value::Float(x) if x.is_finite() => AttributeTag::Plain,
            Value::Float(_) => AttributeTag::Repr(key_of::<f64>()),
            Value::Map(_) => AttributeTag::Collection(CollectionKind::Dict),
            Value::List(_) => AttributeTag::Collection(CollectionKind::List),
            Value::Set(_) => AttributeTag::Collection(CollectionKind::Set),
            Value::Tuple(_) => AttributeTag::Collection(CollectionKind::Tuple),
            Value::Bytes(_) => AttributeTag::Collection(CollectionKind::Bytes),
            Value::ByteArray(_) => AttributeTag::Collection(CollectionKind::ByteArray),
            Value::Path(_) => AttributeTag::Path,
            Value::Callable(function) => AttributeTag::Callable(function.kind()),
            Value::DateTime(_) => AttributeTag::DateTime,
            Value::Object(object) => match self.meta_of(object.as_ref()) {
                Some(_) => AttributeTag::Plain,
                None => AttributeTag::Repr(object.reflect_type_key()),
            },
            Value::Opaque(opaque) if opaque.is_unserializable() => {
                AttributeTag::Unserializable(opaque.type_key().to_owned())
            }
            Value::Opaque(opaque) => AttributeTag::Repr(opaque.type_key().to_owned()),
        }
    }

    /// Encodes a value.
    pub fn encode(&self, value: &Value) -> JsonValue {
        match value {
            Value::Null => JsonValue::Null,
            Value::Bool(flag) => JsonValue::Bool(*flag),
            Value::Int(n) => JsonValue::from(*n),
            Value::UInt(n) => JsonValue::from(*n),
            Value::Float(x) => Number::from_f64(*x)
                .map(JsonValue::Number)
                .unwrap_or_else(|| JsonValue::String(x.to_string())),
            Value::String(text) => JsonValue::String(text.clone()),
            Value::Map(entries) => JsonValue::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), self.encode(value)))
                    .collect(),
            ),
            Value::List(items) | Value::Set(items) | Value::Tuple(items) => {
                JsonValue::Array(items.iter().map(|item| self.encode(item)).collect())
            }
            Value::Bytes(bytes) | Value::ByteArray(bytes) => JsonValue::String(STANDARD.encode(bytes)),
            Value::Path(path) => JsonValue::String(portable_path(path)),
            Value::Callable(function) => JsonValue::String(function.encode()),
            Value::DateTime(stamp) => JsonValue::String(stamp.format(DATETIME_FORMAT).to_string()),
            Value::Object(object) => self.encode_object(object.as_ref()),
            Value::Opaque(opaque) => opaque_text(opaque),
        }
    }

    /// Encodes an object as `{"<type key>": {<attributes>}}`.
    ///
    /// An unregistered object is written as its `Debug` text.
    pub fn encode_object(&self, object: &dyn Object) -> JsonValue {
        let Some(meta) = self.meta_of(object) else {
            log::warn!(
                "`{}` is not registered, writing its textual representation",
                object.reflect_type_path()
            );
            return JsonValue::String(format!("{object:?}"));
        };

        let mut wrapper = Map::with_capacity(1);
        wrapper.insert(
            meta.key().to_owned(),
            JsonValue::Object(self.encode_attributes(meta, object)),
        );
        JsonValue::Object(wrapper)
    }

    fn encode_attributes(&self, meta: &TypeMeta, object: &dyn Object) -> Map<String, JsonValue> {
        let mut attributes = Map::new();
        for field in meta.fields() {
            if self.filter.is_excluded(meta.key(), field.name()) {
                continue;
            }
            let Some(value) = field.get(object) else {
                continue;
            };
            let key = self.attribute_tag(&value).apply(field.name());
            attributes.insert(key, self.encode(&value));
        }
        attributes
    }
}
