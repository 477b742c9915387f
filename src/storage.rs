//! Durable key-value storage for session fields and the last loaded track list.
//!
//! Values are plain strings kept in a single JSON object on disk. Every write
//! goes straight through to the file so a crash never loses a persisted token.

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::RwLock,
};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;

pub const ACCESS_TOKEN: &str = "ACCESS_TOKEN";
pub const TOKEN_TYPE: &str = "TOKEN_TYPE";
pub const EXPIRES_IN: &str = "EXPIRES_IN";
pub const LOADED_TRACKS: &str = "LOADED_TRACKS";

const STORAGE_FILE: &str = "storage.json";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct Storage {
    path: PathBuf,
    items: RwLock<BTreeMap<String, String>>,
}

impl Storage {
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(STORAGE_FILE);

        let items = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), keys = items.len(), "Opened storage");

        Ok(Self {
            path,
            items: RwLock::new(items),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .read()
            .ok()
            .and_then(|items| items.get(key).cloned())
    }

    pub fn set_item(&self, key: &str, value: impl Into<String>) -> Result<(), StorageError> {
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        items.insert(key.to_string(), value.into());
        self.flush(&items)
    }

    pub fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        if items.remove(key).is_some() {
            self.flush(&items)?;
        }
        Ok(())
    }

    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.get_item(key) {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        self.set_item(key, serde_json::to_string(value)?)
    }

    fn flush(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(items)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let storage = Storage::open(dir.path()).unwrap();
            storage.set_item(ACCESS_TOKEN, "token").unwrap();
            storage.set_item(TOKEN_TYPE, "Bearer").unwrap();
        }

        let storage = Storage::open(dir.path()).unwrap();
        assert_eq!(storage.get_item(ACCESS_TOKEN).as_deref(), Some("token"));
        assert_eq!(storage.get_item(TOKEN_TYPE).as_deref(), Some("Bearer"));
        assert_eq!(storage.get_item(EXPIRES_IN), None);
    }

    #[test]
    fn remove_item_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        storage.set_item(EXPIRES_IN, "3600").unwrap();
        storage.remove_item(EXPIRES_IN).unwrap();
        storage.remove_item("never-set").unwrap();

        let reopened = Storage::open(dir.path()).unwrap();
        assert_eq!(reopened.get_item(EXPIRES_IN), None);
    }

    #[test]
    fn json_values_round_trip_through_strings() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();

        storage.set_json(LOADED_TRACKS, &vec!["a", "b"]).unwrap();
        let raw = storage.get_item(LOADED_TRACKS).unwrap();
        assert_eq!(raw, r#"["a","b"]"#);

        let back: Option<Vec<String>> = storage.get_json(LOADED_TRACKS).unwrap();
        assert_eq!(back, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn corrupt_json_value_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        storage.set_item(LOADED_TRACKS, "{not json").unwrap();

        let result: Result<Option<Vec<String>>, _> = storage.get_json(LOADED_TRACKS);
        assert!(matches!(result, Err(StorageError::Json(_))));
    }
}
