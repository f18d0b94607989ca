use core::fmt;

use indexmap::IndexMap;
use oj_utils::hash::HashMap;
use serde_json::{Map, Value as JsonValue};

use super::PersistError;
use crate::{Codec, Object};

/// Field of a stored document holding the encoded object.
pub const DOCUMENT_FIELD: &str = "custom_class";

/// Identifier assigned by a [`DocumentStore`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A document database grouping JSON documents into named collections.
pub trait DocumentStore {
    /// Stores `document`, returning its new id.
    fn insert(&mut self, collection: &str, document: JsonValue) -> Result<DocumentId, PersistError>;

    /// Fetches a document by id.
    fn find(&self, collection: &str, id: &DocumentId) -> Result<Option<JsonValue>, PersistError>;
}

/// A [`DocumentStore`] kept in memory, handing out 24-digit hex ids.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: HashMap<String, IndexMap<DocumentId, JsonValue>>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, IndexMap::len)
    }
}

impl DocumentStore for MemoryStore {
    fn insert(&mut self, collection: &str, document: JsonValue) -> Result<DocumentId, PersistError> {
        self.next_id += 1;
        let id = DocumentId(format!("{:024x}", self.next_id));
        self.collections
            .entry(collection.to_owned())
            .or_default()
            .insert(id.clone(), document);
        Ok(id)
    }

    fn find(&self, collection: &str, id: &DocumentId) -> Result<Option<JsonValue>, PersistError> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|documents| documents.get(id))
            .cloned())
    }
}

/// Stores `object` as `{"custom_class": <document>}` and returns the id.
pub fn save_to_store(
    codec: &Codec,
    object: &dyn Object,
    store: &mut dyn DocumentStore,
    collection: &str,
) -> Result<DocumentId, PersistError> {
    let mut document = Map::with_capacity(1);
    document.insert(DOCUMENT_FIELD.to_owned(), codec.encode_object(object));
    let id = store.insert(collection, JsonValue::Object(document))?;
    log::debug!("stored document `{id}` in `{collection}`");
    Ok(id)
}

/// Loads the document `id` of `collection` into `target`.
pub fn load_from_store(
    codec: &Codec,
    target: &mut dyn Object,
    store: &dyn DocumentStore,
    collection: &str,
    id: &DocumentId,
) -> Result<(), PersistError> {
    let document = store
        .find(collection, id)?
        .ok_or_else(|| PersistError::DocumentNotFound {
            collection: collection.to_owned(),
            id: id.to_string(),
        })?;
    let body = document
        .get(DOCUMENT_FIELD)
        .ok_or_else(|| PersistError::MalformedDocument {
            id: id.to_string(),
            field: DOCUMENT_FIELD,
        })?;
    codec.decode_into(body, target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{DocumentId, DocumentStore, MemoryStore, load_from_store, save_to_store};
    use crate::filter::FilterConfig;
    use crate::persist::PersistError;
    use crate::{Codec, CodecConfig};

    #[derive(crate::Serializable, Clone, PartialEq, Debug)]
    #[objson(type_path = "crm::Contact")]
    struct Contact {
        mongo_uri: String,
        email: String,
    }

    #[derive(crate::Serializable, Clone, PartialEq, Debug)]
    #[objson(type_path = "crm::Book")]
    struct Book {
        mongo_uri: String,
        contacts: Vec<Contact>,
    }

    fn codec() -> Codec {
        let config = CodecConfig {
            filter: FilterConfig {
                excluded_attributes: vec!["^mongo_".to_owned()],
                ..Default::default()
            },
            ..Default::default()
        };
        let registry = Codec::registry_of::<Book>().unwrap();
        Codec::with_config(Arc::new(registry), &config).unwrap()
    }

    #[test]
    fn store_round_trip_keeps_credentials_out() {
        let codec = codec();
        let uri = "mongodb://localhost".to_owned();
        let book = Book {
            mongo_uri: uri.clone(),
            contacts: vec![Contact {
                mongo_uri: uri.clone(),
                email: "a@b.c".to_owned(),
            }],
        };

        let mut store = MemoryStore::new();
        let id = save_to_store(&codec, &book, &mut store, "books").unwrap();
        assert_eq!(id.as_str().len(), 24);
        assert_eq!(store.len("books"), 1);

        let stored = store.find("books", &id).unwrap().unwrap();
        assert!(!stored.to_string().contains("mongodb://"));
        assert!(stored["custom_class"]["crm.book"].is_object());

        let mut loaded = Book {
            mongo_uri: uri,
            contacts: Vec::new(),
        };
        load_from_store(&codec, &mut loaded, &store, "books", &id).unwrap();
        assert_eq!(loaded, book);
    }

    #[test]
    fn unknown_document() {
        let codec = codec();
        let store = MemoryStore::new();
        let mut book = Book {
            mongo_uri: String::new(),
            contacts: Vec::new(),
        };
        assert!(matches!(
            load_from_store(&codec, &mut book, &store, "books", &DocumentId::new("0")),
            Err(PersistError::DocumentNotFound { .. })
        ));
    }
}
