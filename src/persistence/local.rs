//! Browser LocalStorage backend

use super::{KeyValueStore, StorageError};

/// Handle to `window.localStorage`; `None` inside when storage is unavailable
/// (private mode, sandboxed iframe). Reads then miss and writes are rejected.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: Option<web_sys::Storage>,
}

impl LocalStorage {
    pub fn open() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - progress will not persist");
        }
        Self { storage }
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let rejected = || StorageError::WriteRejected {
            key: key.to_string(),
        };
        let storage = self.storage.as_ref().ok_or_else(rejected)?;
        storage.set_item(key, value).map_err(|_| rejected())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };
        storage
            .remove_item(key)
            .map_err(|_| StorageError::RemoveRejected {
                key: key.to_string(),
            })
    }
}
