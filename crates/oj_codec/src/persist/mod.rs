//! Persistence of objects as JSON files and store documents.

// -----------------------------------------------------------------------------
// Modules

mod error;
mod file;
mod store;

// -----------------------------------------------------------------------------
// Exports

pub use error::PersistError;
pub use file::{load_from_json_file, save_to_json_file};
pub use store::{DOCUMENT_FIELD, DocumentId, DocumentStore, MemoryStore};
pub use store::{load_from_store, save_to_store};
