//! Opaque persistence for series collections and encoded splits.
//!
//! Splits are written as single bincode files. The byte format is an
//! implementation detail: callers only rely on `save` followed by `load`
//! round-tripping the value.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Serialize a value to a file, overwriting any existing content.
pub fn save<T: Serialize + ?Sized>(value: &T, path: &Path) -> StoreResult<()> {
    let bytes = bincode::serialize(value).map_err(|e| StoreError::Serialization {
        message: format!("failed to serialize {}: {e}", path.display()),
    })?;
    fs::write(path, bytes).map_err(|e| StoreError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Deserialize a value previously written with [`save`].
pub fn load<T: DeserializeOwned>(path: &Path) -> StoreResult<T> {
    let bytes = fs::read(path).map_err(|e| StoreError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    bincode::deserialize(&bytes).map_err(|e| StoreError::Serialization {
        message: format!("failed to deserialize {}: {e}", path.display()),
    })
}
