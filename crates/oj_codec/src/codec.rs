use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::filter::{AttributeFilter, FilterConfig};
use crate::info::DynamicTypePath;
use crate::json::{DEFAULT_MAX_DEPTH, Decoder, Encoder};
use crate::persist::{self, PersistError};
use crate::registry::{GetTypeMeta, TypeRegistry};
use crate::value::{FieldValue, Value};
use crate::{CodecError, Object};

// -----------------------------------------------------------------------------
// CodecConfig

/// Options of a [`Codec`].
///
/// ```
/// use oj_codec::CodecConfig;
///
/// let config: CodecConfig = serde_json::from_str(r#"{
///     "excluded_attributes": ["^mongo_"],
///     "max_depth": 64
/// }"#).unwrap();
/// assert_eq!(config.max_depth, 64);
/// assert!(config.pretty);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    #[serde(flatten)]
    pub filter: FilterConfig,
    /// Maximum nesting accepted when decoding.
    pub max_depth: usize,
    /// Indent text output by two spaces.
    pub pretty: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            pretty: true,
        }
    }
}

// -----------------------------------------------------------------------------
// Codec

/// A registry and attribute filter bundled for encoding and decoding.
#[derive(Clone)]
pub struct Codec {
    registry: Arc<TypeRegistry>,
    filter: AttributeFilter,
    max_depth: usize,
    pretty: bool,
}

impl Codec {
    /// A codec with default options.
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            filter: AttributeFilter::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            pretty: true,
        }
    }

    /// A codec with `config`, failing on invalid patterns.
    pub fn with_config(registry: Arc<TypeRegistry>, config: &CodecConfig) -> Result<Self, CodecError> {
        Ok(Self {
            registry,
            filter: AttributeFilter::new(&config.filter)?,
            max_depth: config.max_depth,
            pretty: config.pretty,
        })
    }

    /// A registry holding the auto-registered types plus `T` and its
    /// dependencies.
    pub fn registry_of<T: GetTypeMeta>() -> Result<TypeRegistry, CodecError> {
        let mut registry = TypeRegistry::new();
        registry.auto_register()?;
        registry.register::<T>()?;
        Ok(registry)
    }

    /// A codec with default options for `T`.
    pub fn of<T: GetTypeMeta>() -> Result<Self, CodecError> {
        Ok(Self::new(Arc::new(Self::registry_of::<T>()?)))
    }

    /// Supplies a fallback constructor argument.
    pub fn with_fallback(mut self, name: impl Into<String>, value: impl FieldValue) -> Self {
        self.filter = self.filter.with_fallback(name, value.to_value());
        self
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    #[inline]
    pub fn filter(&self) -> &AttributeFilter {
        &self.filter
    }

    #[inline]
    pub fn encoder(&self) -> Encoder<'_> {
        Encoder::new(&self.registry, &self.filter)
    }

    #[inline]
    pub fn decoder(&self) -> Decoder<'_> {
        Decoder::new(&self.registry, &self.filter).with_max_depth(self.max_depth)
    }

    #[inline]
    pub fn encode(&self, value: &Value) -> JsonValue {
        self.encoder().encode(value)
    }

    #[inline]
    pub fn encode_object(&self, object: &dyn Object) -> JsonValue {
        self.encoder().encode_object(object)
    }

    #[inline]
    pub fn decode(&self, json: &JsonValue) -> Result<Value, CodecError> {
        self.decoder().decode(json)
    }

    /// Decodes a new `T`.
    pub fn decode_as<T: Object>(&self, json: &JsonValue) -> Result<T, CodecError> {
        match self.decode(json)? {
            Value::Object(object) => object.take::<T>().map_err(|other| CodecError::TargetMismatch {
                expected: core::any::type_name::<T>().to_owned(),
                found: format!("`{}`", other.reflect_type_path()),
            }),
            other => Err(CodecError::TargetMismatch {
                expected: core::any::type_name::<T>().to_owned(),
                found: format!("a {}", other.kind()),
            }),
        }
    }

    /// Decodes `json` into `target` in place.
    ///
    /// Fields of `target` matching an extra-attribute pattern serve as
    /// fallback arguments for nested objects. A document of another type
    /// is rejected.
    pub fn decode_into(&self, json: &JsonValue, target: &mut dyn Object) -> Result<(), CodecError> {
        let fallbacks = match self.registry.get(target.object_type_id()) {
            Some(meta) => self.filter.harvest(meta, target),
            None => self.filter.fallbacks().clone(),
        };
        let decoded = self
            .decoder()
            .with_fallbacks(&fallbacks)
            .decode_into(json, target)?;
        match decoded {
            None => Ok(()),
            Some(value) => Err(CodecError::TargetMismatch {
                expected: target.reflect_type_path().to_owned(),
                found: describe(&value),
            }),
        }
    }

    /// Renders `json` as text.
    pub fn render(&self, json: &JsonValue) -> Result<String, CodecError> {
        let text = if self.pretty {
            serde_json::to_string_pretty(json)?
        } else {
            serde_json::to_string(json)?
        };
        Ok(text)
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Object(object) => format!("`{}`", object.reflect_type_path()),
        other => format!("a {}", other.kind()),
    }
}

// -----------------------------------------------------------------------------
// Serializable

/// The capability of registered objects: document and text conversion
/// plus file persistence.
///
/// Implemented for every [`Object`].
pub trait Serializable: Object {
    /// Encodes `self` as a document.
    fn serialize(&self, codec: &Codec) -> JsonValue
    where
        Self: Sized,
    {
        codec.encode_object(self)
    }

    /// Decodes `json` into `self`.
    fn deserialize(&mut self, codec: &Codec, json: &JsonValue) -> Result<(), CodecError>
    where
        Self: Sized,
    {
        codec.decode_into(json, self)
    }

    /// Encodes `self` as JSON text.
    fn to_text(&self, codec: &Codec) -> Result<String, CodecError>
    where
        Self: Sized,
    {
        codec.render(&self.serialize(codec))
    }

    /// Decodes JSON text into `self`.
    fn from_text(&mut self, codec: &Codec, text: &str) -> Result<(), CodecError>
    where
        Self: Sized,
    {
        let json: JsonValue = serde_json::from_str(text)?;
        self.deserialize(codec, &json)
    }

    /// Writes `self` to `path`, creating missing parent directories.
    fn save_to_json_file(&self, codec: &Codec, path: impl AsRef<Path>) -> Result<(), PersistError>
    where
        Self: Sized,
    {
        persist::save_to_json_file(codec, self, path.as_ref())
    }

    /// Loads `path` into `self`.
    fn load_from_json_file(&mut self, codec: &Codec, path: impl AsRef<Path>) -> Result<(), PersistError>
    where
        Self: Sized,
    {
        persist::load_from_json_file(codec, self, path.as_ref())
    }
}

impl<T: Object> Serializable for T {}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};
    use std::path::PathBuf;
    use std::sync::Arc;

    use chrono::NaiveDate;
    use serde_json::json;

    use super::{Codec, CodecConfig, Serializable};
    use crate::{CodecError, Object};
    use crate::filter::FilterConfig;
    use crate::registry::{GetTypeMeta, TypeRegistry};
    use crate::value::{ByteArray, Bytes, FunctionRef, OpaqueValue, Value, ValueError};

    #[derive(crate::Serializable, Clone, PartialEq, Debug, Default)]
    #[objson(type_path = "pkg::Inner")]
    struct Inner {
        name: String,
    }

    #[derive(crate::Serializable, Clone, PartialEq, Debug)]
    #[objson(type_path = "pkg::Outer")]
    struct Outer {
        ids: BTreeSet<i64>,
        created: chrono::NaiveDateTime,
        child: Inner,
    }

    fn outer() -> Outer {
        Outer {
            ids: [1, 2].into(),
            created: NaiveDate::from_ymd_opt(2024, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap(),
            child: Inner { name: "n".to_owned() },
        }
    }

    fn blank_outer() -> Outer {
        Outer {
            ids: BTreeSet::new(),
            created: chrono::NaiveDateTime::default(),
            child: Inner::default(),
        }
    }

    #[test]
    fn nested_document_layout() {
        let codec = Codec::of::<Outer>().unwrap();
        let json = outer().serialize(&codec);
        assert_eq!(
            json,
            json!({
                "pkg.outer": {
                    "collection::::set::::ids": [1, 2],
                    "datetime::::created": "2024-01-01T00:00:00",
                    "child": { "pkg.inner": { "name": "n" } }
                }
            })
        );

        let mut target = blank_outer();
        target.deserialize(&codec, &json).unwrap();
        assert_eq!(target, outer());
        assert_eq!(codec.decode_as::<Outer>(&json).unwrap(), outer());
    }

    #[derive(crate::Serializable, Clone, PartialEq, Debug)]
    #[objson(type_path = "pkg::Kinds")]
    struct Kinds {
        blob: Bytes,
        buffer: ByteArray,
        home: PathBuf,
        pair: (i64, String),
        labels: Vec<String>,
        scores: BTreeMap<String, f64>,
        ratio: f64,
    }

    #[test]
    fn variants_survive_the_document() {
        let codec = Codec::of::<Kinds>().unwrap();
        let kinds = Kinds {
            blob: Bytes(b"hi".to_vec()),
            buffer: ByteArray(vec![0, 255]),
            home: PathBuf::from("/srv/data"),
            pair: (7, "seven".to_owned()),
            labels: vec!["a".to_owned()],
            scores: [("x".to_owned(), 0.5)].into(),
            ratio: 1.5,
        };

        let json = kinds.serialize(&codec);
        let attributes = &json["pkg.kinds"];
        assert_eq!(attributes["collection::::bytes::::blob"], "aGk=");
        assert_eq!(attributes["collection::::bytearray::::buffer"], "AP8=");
        assert_eq!(attributes["path::::home"], "/srv/data");
        assert_eq!(attributes["collection::::tuple::::pair"], json!([7, "seven"]));
        assert_eq!(attributes["collection::::list::::labels"], json!(["a"]));
        assert_eq!(attributes["collection::::dict::::scores"], json!({ "x": 0.5 }));
        assert_eq!(attributes["ratio"], 1.5);

        assert_eq!(codec.decode_as::<Kinds>(&json).unwrap(), kinds);
    }

    #[derive(crate::Serializable, Clone, PartialEq, Debug)]
    #[objson(type_path = "pkg::Odd")]
    struct Odd {
        handle: OpaqueValue,
        level: OpaqueValue,
        ratio: Value,
    }

    #[test]
    fn unrepresentable_values() {
        let codec = Codec::of::<Odd>().unwrap();
        let odd = Odd {
            handle: OpaqueValue::new("pkg.handle", None),
            level: OpaqueValue::new("pkg.level", Some("Level(3)".to_owned())),
            ratio: Value::Float(f64::INFINITY),
        };

        let json = odd.serialize(&codec);
        assert_eq!(
            json,
            json!({
                "pkg.odd": {
                    "UNSERIALIZABLE::::pkg.handle::::handle": "UNSERIALIZABLE",
                    "repr::::pkg.level::::level": "Level(3)",
                    "repr::::f64::::ratio": "inf"
                }
            })
        );

        let decoded = codec.decode_as::<Odd>(&json).unwrap();
        assert_eq!(decoded.handle, odd.handle);
        assert_eq!(decoded.level, odd.level);
        assert_eq!(
            decoded.ratio,
            Value::Opaque(OpaqueValue::new("f64", Some("inf".to_owned())))
        );
    }

    #[derive(crate::Serializable, Clone, PartialEq, Debug)]
    #[objson(type_path = "pkg::Ratio")]
    struct Ratio {
        r: f64,
        peaks: Vec<f64>,
    }

    #[test]
    fn non_finite_float_fields() {
        let codec = Codec::of::<Ratio>().unwrap();
        let ratio = Ratio {
            r: f64::NAN,
            peaks: vec![f64::NEG_INFINITY, 1.5],
        };

        let json = ratio.serialize(&codec);
        assert_eq!(
            json,
            json!({
                "pkg.ratio": {
                    "repr::::f64::::r": "NaN",
                    "collection::::list::::peaks": ["-inf", 1.5]
                }
            })
        );

        let decoded = codec.decode_as::<Ratio>(&json).unwrap();
        assert!(decoded.r.is_nan());
        assert_eq!(decoded.peaks, ratio.peaks);

        let broken = json!({ "pkg.ratio": { "repr::::f64::::r": "many", "peaks": [] } });
        assert!(matches!(
            codec.decode_as::<Ratio>(&broken),
            Err(CodecError::Field { .. })
        ));
    }

    #[derive(crate::Serializable, Clone, PartialEq, Debug)]
    #[objson(type_path = "pkg::Blobs")]
    struct Blobs {
        chunks: Vec<Bytes>,
        named: BTreeMap<String, ByteArray>,
        maybe: Option<Bytes>,
    }

    #[test]
    fn byte_sequences_nested_in_collections() {
        let codec = Codec::of::<Blobs>().unwrap();
        let blobs = Blobs {
            chunks: vec![Bytes(b"hi".to_vec()), Bytes(Vec::new())],
            named: [("k".to_owned(), ByteArray(vec![1]))].into(),
            maybe: Some(Bytes(vec![0, 255])),
        };

        let json = blobs.serialize(&codec);
        assert_eq!(
            json,
            json!({
                "pkg.blobs": {
                    "collection::::list::::chunks": ["aGk=", ""],
                    "collection::::dict::::named": { "k": "AQ==" },
                    "collection::::bytes::::maybe": "AP8="
                }
            })
        );
        assert_eq!(codec.decode_as::<Blobs>(&json).unwrap(), blobs);

        let broken = json!({
            "pkg.blobs": {
                "collection::::list::::chunks": ["%%"],
                "collection::::dict::::named": {},
                "maybe": null
            }
        });
        assert!(matches!(
            codec.decode_as::<Blobs>(&broken),
            Err(CodecError::Field { source: ValueError::Base64(_), .. })
        ));
    }

    #[derive(crate::Serializable, Clone, PartialEq, Debug)]
    #[objson(type_path = "zoo::Cat")]
    struct Cat {
        lives: u8,
    }

    #[derive(crate::Serializable, Clone, PartialEq, Debug)]
    #[objson(type_path = "zoo::Dog")]
    struct Dog {
        name: String,
    }

    #[derive(crate::Serializable, Clone, PartialEq, Debug)]
    #[objson(type_path = "zoo::Zoo")]
    struct Zoo {
        animals: Vec<Box<dyn Object>>,
        keeper: Option<Box<dyn Object>>,
    }

    #[test]
    fn boxed_objects_keep_their_concrete_type() {
        let mut registry = Codec::registry_of::<Zoo>().unwrap();
        registry.register::<Cat>().unwrap();
        registry.register::<Dog>().unwrap();
        let codec = Codec::new(Arc::new(registry));

        let zoo = Zoo {
            animals: vec![
                Box::new(Cat { lives: 9 }),
                Box::new(Dog { name: "rex".to_owned() }),
            ],
            keeper: Some(Box::new(Dog { name: "sam".to_owned() })),
        };

        let json = zoo.serialize(&codec);
        assert_eq!(
            json,
            json!({
                "zoo.zoo": {
                    "collection::::list::::animals": [
                        { "zoo.cat": { "lives": 9 } },
                        { "zoo.dog": { "name": "rex" } }
                    ],
                    "keeper": { "zoo.dog": { "name": "sam" } }
                }
            })
        );

        let decoded = codec.decode_as::<Zoo>(&json).unwrap();
        assert!(decoded.animals[0].is::<Cat>());
        assert!(decoded.animals[1].is::<Dog>());
        assert_eq!(decoded, zoo);

        let plain = json!({ "zoo.zoo": { "animals": [1], "keeper": null } });
        assert!(matches!(
            codec.decode_as::<Zoo>(&plain),
            Err(CodecError::Field { source: ValueError::Mismatch { expected: "object", .. }, .. })
        ));
    }

    #[test]
    fn delimited_keys_outside_dicts() {
        let codec = Codec::of::<Inner>().unwrap();
        assert!(matches!(
            codec.decode(&json!([{ "path::::x": 1 }])),
            Err(CodecError::InvalidTaggedValue { .. })
        ));

        let value = codec
            .decode(&json!({ "collection::::dict::::m": { "path::::x": 1 } }))
            .unwrap();
        let Value::Map(entries) = value else {
            panic!("expected a map");
        };
        let Value::Map(inner) = &entries["m"] else {
            panic!("expected a nested map");
        };
        assert_eq!(inner["path::::x"], Value::Int(1));
    }

    #[derive(crate::Serializable, Clone, PartialEq, Debug)]
    #[objson(type_path = "pkg::Holder")]
    struct Holder {
        inner: Inner,
    }

    #[test]
    fn unregistered_object_falls_back_to_repr() {
        let mut registry = TypeRegistry::new();
        registry.add_type_meta(Holder::get_type_meta()).unwrap();
        let codec = Codec::new(Arc::new(registry));

        let holder = Holder {
            inner: Inner { name: "x".to_owned() },
        };
        assert_eq!(
            holder.serialize(&codec),
            json!({
                "pkg.holder": {
                    "repr::::pkg.inner::::inner": "Inner { name: \"x\" }"
                }
            })
        );
    }

    #[derive(crate::Serializable, Clone, PartialEq, Debug)]
    #[objson(type_path = "pkg::Vault")]
    struct Vault {
        secret_key: String,
        name: String,
    }

    #[derive(crate::Serializable, Clone, PartialEq, Debug)]
    #[objson(type_path = "pkg::Note")]
    struct Note {
        secret_key: String,
    }

    #[test]
    fn exclusion_is_scoped() {
        let mut registry = TypeRegistry::new();
        registry.register::<Vault>().unwrap();
        registry.register::<Note>().unwrap();
        let config = CodecConfig {
            filter: FilterConfig {
                excluded_attributes: vec!["secret".to_owned()],
                excluded_attribute_scope: vec!["pkg.vault".to_owned()],
                ..Default::default()
            },
            ..Default::default()
        };
        let codec = Codec::with_config(Arc::new(registry), &config).unwrap();

        let vault = Vault {
            secret_key: "k".to_owned(),
            name: "v".to_owned(),
        };
        assert_eq!(vault.serialize(&codec), json!({ "pkg.vault": { "name": "v" } }));

        let note = Note {
            secret_key: "k".to_owned(),
        };
        assert_eq!(
            note.serialize(&codec),
            json!({ "pkg.note": { "secret_key": "k" } })
        );
    }

    #[derive(crate::Serializable, Clone, PartialEq, Debug)]
    #[objson(type_path = "app::Shelf")]
    struct Shelf {
        mongo_host: String,
        label: String,
    }

    #[derive(crate::Serializable, Clone, PartialEq, Debug)]
    #[objson(type_path = "app::Store")]
    struct Store {
        mongo_host: String,
        shelves: Vec<Shelf>,
    }

    fn store_codec() -> Codec {
        let config = CodecConfig {
            filter: FilterConfig {
                excluded_attributes: vec!["^mongo_".to_owned()],
                ..Default::default()
            },
            ..Default::default()
        };
        let registry = Codec::registry_of::<Store>().unwrap();
        Codec::with_config(Arc::new(registry), &config).unwrap()
    }

    #[test]
    fn excluded_attributes_come_back_as_extras() {
        let codec = store_codec();
        let store = Store {
            mongo_host: "db:27017".to_owned(),
            shelves: vec![Shelf {
                mongo_host: "db:27017".to_owned(),
                label: "top".to_owned(),
            }],
        };

        let json = store.serialize(&codec);
        assert_eq!(
            json,
            json!({
                "app.store": {
                    "collection::::list::::shelves": [
                        { "app.shelf": { "label": "top" } }
                    ]
                }
            })
        );

        let mut target = Store {
            mongo_host: "db:27017".to_owned(),
            shelves: Vec::new(),
        };
        target.deserialize(&codec, &json).unwrap();
        assert_eq!(target, store);
    }

    #[test]
    fn unresolved_required_parameter() {
        let codec = store_codec();
        let json = json!({ "app.shelf": { "label": "top" } });
        match codec.decode(&json) {
            Err(CodecError::MissingParameters { type_path, params }) => {
                assert_eq!(type_path, "app::Shelf");
                assert_eq!(params, ["mongo_host"]);
            }
            other => panic!("unexpected {other:?}"),
        }

        let codec = codec.with_fallback("mongo_host", String::from("cache:1"));
        let shelf = codec.decode_as::<Shelf>(&json).unwrap();
        assert_eq!(shelf.mongo_host, "cache:1");
    }

    #[derive(crate::Serializable, Clone, PartialEq, Debug)]
    #[objson(type_path = "pkg::Session")]
    struct Session {
        user: String,
        #[objson(default)]
        retries: u32,
        #[objson(skip)]
        cache: Vec<u8>,
    }

    #[test]
    fn in_place_keeps_unserialized_state() {
        let codec = Codec::of::<Session>().unwrap();
        let json = json!({ "pkg.session": { "user": "ann", "unknown": 1 } });

        let mut session = Session {
            user: String::new(),
            retries: 4,
            cache: vec![1, 2, 3],
        };
        session.deserialize(&codec, &json).unwrap();
        assert_eq!(session.user, "ann");
        assert_eq!(session.retries, 4);
        assert_eq!(session.cache, [1, 2, 3]);

        let fresh = codec.decode_as::<Session>(&json).unwrap();
        assert_eq!(fresh.retries, 0);
        assert!(fresh.cache.is_empty());
    }

    #[test]
    fn mismatched_target() {
        let codec = Codec::of::<Outer>().unwrap();
        let json = Inner { name: "n".to_owned() }.serialize(&codec);
        let mut target = blank_outer();
        assert!(matches!(
            target.deserialize(&codec, &json),
            Err(CodecError::TargetMismatch { .. })
        ));
    }

    #[test]
    fn malformed_tag_is_rejected() {
        let codec = Codec::of::<Inner>().unwrap();
        let json = json!({ "pkg.inner": { "a::::b::::c::::name": "n" } });
        assert!(matches!(
            codec.decode(&json),
            Err(CodecError::MalformedTag { .. })
        ));
    }

    fn double(args: &[Value]) -> Result<Value, CodecError> {
        match args {
            [Value::Int(n)] => Ok(Value::Int(n * 2)),
            _ => Ok(Value::Null),
        }
    }

    #[derive(crate::Serializable, Clone, PartialEq, Debug)]
    #[objson(type_path = "pkg::Job")]
    struct Job {
        step: FunctionRef,
    }

    #[test]
    fn callables_resolve_through_the_registry() {
        let step = FunctionRef::function("ops", "double", double).with_param::<i64>("n");
        let mut registry = Codec::registry_of::<Job>().unwrap();
        registry.register_function(step.clone()).unwrap();
        let codec = Codec::new(Arc::new(registry));

        let json = Job { step }.serialize(&codec);
        assert_eq!(
            json,
            json!({ "pkg.job": { "callable::::function::::step": "ops.double::::n:i64" } })
        );
        let job = codec.decode_as::<Job>(&json).unwrap();
        assert_eq!(job.step.call(&[Value::Int(21)]).unwrap(), Value::Int(42));

        let method = json!({ "pkg.job": { "callable::::method::::step": "pkg.job.run::::" } });
        assert!(matches!(
            codec.decode(&method),
            Err(CodecError::UnsupportedCallable { .. })
        ));

        let missing = json!({ "pkg.job": { "callable::::function::::step": "ops.triple::::" } });
        assert!(matches!(
            codec.decode(&missing),
            Err(CodecError::UnresolvedCallable { .. })
        ));
    }

    #[test]
    fn plain_json_decodes_to_plain_values() {
        let codec = Codec::of::<Inner>().unwrap();
        let value = codec
            .decode(&json!({ "a": [1, "x", null], "collection::::set::::s": [1, 1] }))
            .unwrap();
        let Value::Map(entries) = value else {
            panic!("expected a map");
        };
        assert_eq!(
            entries["a"],
            Value::List(vec![Value::Int(1), Value::from("x"), Value::Null])
        );
        assert_eq!(entries["s"], Value::set([Value::Int(1)]));
    }

    #[test]
    fn depth_limit() {
        let config = CodecConfig {
            max_depth: 3,
            ..Default::default()
        };
        let codec = Codec::with_config(Arc::new(TypeRegistry::new()), &config).unwrap();
        assert!(codec.decode(&json!([[1]])).is_ok());
        assert!(matches!(
            codec.decode(&json!([[[[[1]]]]])),
            Err(CodecError::DepthLimitExceeded { limit: 3 })
        ));
    }

    #[test]
    fn text_form() {
        let codec = Codec::of::<Inner>().unwrap();
        let inner = Inner { name: "ü".to_owned() };
        let text = inner.to_text(&codec).unwrap();
        assert!(text.starts_with("{\n  \"pkg.inner\""));
        assert!(text.contains('ü'));

        let mut back = Inner::default();
        back.from_text(&codec, &text).unwrap();
        assert_eq!(back, inner);
        assert!(matches!(
            back.from_text(&codec, "{"),
            Err(CodecError::Json(_))
        ));
    }

    #[cfg(feature = "auto_register")]
    mod auto {
        use super::Codec;

        #[derive(crate::Serializable, Clone, PartialEq, Debug)]
        #[objson(type_path = "auto::Plugin", auto_register)]
        struct Plugin {
            id: u32,
        }

        #[derive(crate::Serializable, Clone, PartialEq, Debug)]
        #[objson(type_path = "auto::Host")]
        struct Host {
            id: u32,
        }

        #[test]
        fn discovered_without_reference() {
            let codec = Codec::of::<Host>().unwrap();
            assert!(codec.registry().get_with_key("auto.plugin").is_some());
            let plugin = codec
                .decode_as::<Plugin>(&serde_json::json!({ "auto.plugin": { "id": 3 } }))
                .unwrap();
            assert_eq!(plugin, Plugin { id: 3 });
        }
    }
}
