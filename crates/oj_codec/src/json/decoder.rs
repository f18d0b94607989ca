use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};

use super::{AttributeTag, CollectionKind, parse_attribute_key};
use super::{DATETIME_FORMAT, DEFAULT_MAX_DEPTH, DELIMITER};
use crate::filter::AttributeFilter;
use crate::registry::{Arguments, TypeMeta, TypeRegistry};
use crate::value::{CallableKind, OpaqueValue, Value};
use crate::{CodecError, Object};

type Attributes = IndexMap<String, Value>;

fn json_kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn invalid(key: &str, expected: &'static str, json: &JsonValue) -> CodecError {
    CodecError::InvalidTaggedValue {
        key: key.to_owned(),
        expected,
        found: json_kind(json),
    }
}

fn expect_str<'j>(key: &str, json: &'j JsonValue) -> Result<&'j str, CodecError> {
    json.as_str().ok_or_else(|| invalid(key, "a string", json))
}

/// Reads JSON documents back into [`Value`]s and objects.
///
/// Registered objects are rebuilt through their constructor, with missing
/// required parameters filled from fallback extras.
pub struct Decoder<'a> {
    registry: &'a TypeRegistry,
    filter: &'a AttributeFilter,
    fallbacks: Option<&'a Attributes>,
    max_depth: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(registry: &'a TypeRegistry, filter: &'a AttributeFilter) -> Self {
        Self {
            registry,
            filter,
            fallbacks: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Uses `fallbacks` instead of the filter's explicit fallbacks.
    pub fn with_fallbacks(mut self, fallbacks: &'a Attributes) -> Self {
        self.fallbacks = Some(fallbacks);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn fallbacks(&self) -> &'a Attributes {
        self.fallbacks.unwrap_or_else(|| self.filter.fallbacks())
    }

    /// Decodes a document into a new value.
    pub fn decode(&self, json: &JsonValue) -> Result<Value, CodecError> {
        self.decode_node(json, 0)
    }

    /// Decodes a document, reusing `target` when it is an object of the
    /// document's type.
    ///
    /// Returns `None` when `target` was updated in place, otherwise the
    /// newly decoded value.
    pub fn decode_into(
        &self,
        json: &JsonValue,
        target: &mut dyn Object,
    ) -> Result<Option<Value>, CodecError> {
        if let JsonValue::Object(map) = json
            && let Some((meta, attributes)) = self.registered_object(map)
            && meta.type_id() == target.object_type_id()
        {
            log::trace!("decoding `{}` in place", meta.key());
            let attributes = self.decode_attributes(attributes, 1)?;
            self.assign(meta, target, attributes)?;
            return Ok(None);
        }
        self.decode_node(json, 0).map(Some)
    }

    fn check_depth(&self, depth: usize) -> Result<(), CodecError> {
        if depth > self.max_depth {
            return Err(CodecError::DepthLimitExceeded {
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    /// A single-key object whose key is a registered Type Key and whose
    /// value is an object.
    fn registered_object<'j>(
        &self,
        map: &'j Map<String, JsonValue>,
    ) -> Option<(&'a TypeMeta, &'j Map<String, JsonValue>)> {
        if map.len() != 1 {
            return None;
        }
        let (key, attributes) = map.iter().next()?;
        Some((self.registry.get_with_key(key)?, attributes.as_object()?))
    }

    fn decode_node(&self, json: &JsonValue, depth: usize) -> Result<Value, CodecError> {
        self.check_depth(depth)?;
        Ok(match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(flag) => Value::Bool(*flag),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            JsonValue::String(text) => Value::String(text.clone()),
            JsonValue::Array(items) => Value::List(self.decode_items(items, depth)?),
            JsonValue::Object(map) => match self.registered_object(map) {
                Some((meta, attributes)) => {
                    log::trace!("decoding `{}`", meta.key());
                    let attributes = self.decode_attributes(attributes, depth + 1)?;
                    Value::Object(self.construct(meta, attributes)?)
                }
                None => Value::Map(self.decode_attributes(map, depth)?),
            },
        })
    }

    fn decode_items(&self, items: &[JsonValue], depth: usize) -> Result<Vec<Value>, CodecError> {
        items
            .iter()
            .map(|item| self.decode_node(item, depth + 1))
            .collect()
    }

    /// Decodes an object whose keys may carry tags.
    fn decode_attributes(
        &self,
        map: &Map<String, JsonValue>,
        depth: usize,
    ) -> Result<Attributes, CodecError> {
        map.iter()
            .map(|(key, json)| {
                let (tag, name) = parse_attribute_key(key)?;
                let value = self.decode_tagged(&tag, key, json, depth + 1)?;
                Ok((name.to_owned(), value))
            })
            .collect()
    }

    fn decode_tagged(
        &self,
        tag: &AttributeTag,
        key: &str,
        json: &JsonValue,
        depth: usize,
    ) -> Result<Value, CodecError> {
        self.check_depth(depth)?;
        Ok(match tag {
            AttributeTag::Plain => self.decode_node(json, depth)?,
            AttributeTag::Collection(kind) => self.decode_collection(*kind, key, json, depth)?,
            AttributeTag::Path => Value::Path(PathBuf::from(expect_str(key, json)?)),
            AttributeTag::DateTime => {
                let text = expect_str(key, json)?;
                let stamp = NaiveDateTime::parse_from_str(text, DATETIME_FORMAT).map_err(
                    |source| CodecError::InvalidTimestamp {
                        key: key.to_owned(),
                        source,
                    },
                )?;
                Value::DateTime(stamp)
            }
            AttributeTag::Callable(CallableKind::Method) => {
                return Err(CodecError::UnsupportedCallable {
                    key: key.to_owned(),
                });
            }
            AttributeTag::Callable(CallableKind::Function) => {
                self.resolve_function(expect_str(key, json)?)?
            }
            AttributeTag::Repr(type_key) => Value::Opaque(OpaqueValue::new(
                type_key.clone(),
                Some(expect_str(key, json)?.to_owned()),
            )),
            AttributeTag::Unserializable(type_key) => {
                Value::Opaque(OpaqueValue::new(type_key.clone(), None))
            }
        })
    }

    fn decode_collection(
        &self,
        kind: CollectionKind,
        key: &str,
        json: &JsonValue,
        depth: usize,
    ) -> Result<Value, CodecError> {
        let items = || {
            json.as_array()
                .ok_or_else(|| invalid(key, "an array", json))
                .and_then(|items| self.decode_items(items, depth))
        };
        let bytes = || -> Result<Vec<u8>, CodecError> {
            STANDARD
                .decode(expect_str(key, json)?)
                .map_err(|source| CodecError::InvalidBase64 {
                    key: key.to_owned(),
                    source,
                })
        };
        Ok(match kind {
            CollectionKind::Dict => {
                let map = json.as_object().ok_or_else(|| invalid(key, "an object", json))?;
                let entries = map
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), self.decode_node(v, depth + 1)?)))
                    .collect::<Result<Attributes, CodecError>>()?;
                Value::Map(entries)
            }
            CollectionKind::List => Value::List(items()?),
            CollectionKind::Set => Value::set(items()?),
            CollectionKind::Tuple => Value::Tuple(items()?),
            CollectionKind::Bytes => Value::Bytes(bytes()?),
            CollectionKind::ByteArray => Value::ByteArray(bytes()?),
        })
    }

    fn resolve_function(&self, text: &str) -> Result<Value, CodecError> {
        let (path, signature) = text.split_once(DELIMITER).unwrap_or((text, ""));
        let function = self
            .registry
            .get_function(path)
            .ok_or_else(|| CodecError::UnresolvedCallable {
                path: path.to_owned(),
            })?;
        if function.signature() != signature {
            log::warn!(
                "callable `{path}` recorded as `{signature}`, registered as `{}`",
                function.signature()
            );
        }
        Ok(Value::Callable(function.clone()))
    }

    /// Builds a new instance, then overlays every decoded attribute.
    fn construct(
        &self,
        meta: &TypeMeta,
        attributes: Attributes,
    ) -> Result<Box<dyn Object>, CodecError> {
        let constructor = meta.constructor().ok_or(CodecError::NoConstructor {
            type_path: meta.type_path(),
        })?;

        let mut arguments: Attributes = constructor
            .params()
            .iter()
            .filter_map(|p| Some((p.name().to_owned(), attributes.get(p.name())?.clone())))
            .collect();

        let missing: Vec<&str> = constructor
            .required_params()
            .filter(|name| !arguments.contains_key(*name))
            .collect();
        let extras = self.filter.supply_extras(meta.key(), &missing, self.fallbacks());
        for (name, value) in extras {
            if constructor.has_param(&name) {
                arguments.insert(name, value);
            }
        }

        let unresolved: Vec<String> = constructor
            .required_params()
            .filter(|name| !arguments.contains_key(*name))
            .map(str::to_owned)
            .collect();
        if !unresolved.is_empty() {
            return Err(CodecError::MissingParameters {
                type_path: meta.type_path(),
                params: unresolved,
            });
        }

        let mut object = constructor.construct(Arguments::new(meta.type_path(), arguments))?;
        self.assign(meta, object.as_mut(), attributes)?;
        Ok(object)
    }

    fn assign(
        &self,
        meta: &TypeMeta,
        target: &mut dyn Object,
        attributes: Attributes,
    ) -> Result<(), CodecError> {
        for (name, value) in attributes {
            let Some(field) = meta.field(&name) else {
                log::warn!("`{}` has no attribute `{name}`, skipping it", meta.type_path());
                continue;
            };
            field.set(target, value).map_err(|source| CodecError::Field {
                type_path: meta.type_path(),
                field: name,
                source,
            })?;
        }
        Ok(())
    }
}
