use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value as JsonValue;

use super::PersistError;
use crate::info::DynamicTypePath;
use crate::{Codec, Object};

/// Writes `object` to `path` as JSON text, creating parent directories.
pub fn save_to_json_file(codec: &Codec, object: &dyn Object, path: &Path) -> Result<(), PersistError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let text = codec.render(&codec.encode_object(object))?;
    fs::write(path, text)?;
    log::debug!("saved `{}` to {}", object.reflect_type_path(), path.display());
    Ok(())
}

/// Reads the JSON file at `path` into `target`.
pub fn load_from_json_file(codec: &Codec, target: &mut dyn Object, path: &Path) -> Result<(), PersistError> {
    let text = fs::read_to_string(path).map_err(|error| match error.kind() {
        ErrorKind::NotFound => PersistError::FileNotFound(path.to_path_buf()),
        _ => PersistError::Io(error),
    })?;
    let json: JsonValue = serde_json::from_str(&text)?;
    codec.decode_into(&json, target)?;
    log::debug!("loaded {}", path.display());
    Ok(())
}
