use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::CodecError;

/// An error raised while saving or loading an object.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("file `{}` does not exist", .0.display())]
    FileNotFound(PathBuf),

    #[error("no document `{id}` in collection `{collection}`")]
    DocumentNotFound { collection: String, id: String },

    /// A stored document lacking the object field.
    #[error("document `{id}` has no `{field}` field")]
    MalformedDocument { id: String, field: &'static str },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl From<serde_json::Error> for PersistError {
    #[inline]
    fn from(error: serde_json::Error) -> Self {
        PersistError::Codec(CodecError::Json(error))
    }
}
