//! Save/load against a key-value store
//!
//! Features:
//! - Single JSON blob under a fixed key
//! - Fail-open loading: malformed or missing saves fall back to defaults
//! - Older saves are upgraded field by field via `#[serde(default)]`
//! - `LocalStorage` on the web, `MemoryStore` everywhere else

#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

use std::collections::HashMap;

use thiserror::Error;

use crate::profile::Profile;

/// Key the profile is stored under
pub const SAVE_KEY: &str = "drift_city_save";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to serialize: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage rejected write to `{key}`")]
    WriteRejected { key: String },
    #[error("storage failed to remove `{key}`")]
    RemoveRejected { key: String },
}

/// Synchronous string key-value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store for tests and the native build
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Load the profile, falling back to a fresh one on any problem
pub fn load_profile<S: KeyValueStore>(store: &S) -> Profile {
    let Some(json) = store.get(SAVE_KEY) else {
        log::info!("No save found, starting fresh");
        return Profile::new();
    };

    match serde_json::from_str::<Profile>(&json) {
        Ok(mut profile) => {
            profile.sanitize();
            log::info!(
                "Loaded save ({} credits, {} vehicles unlocked)",
                profile.credits,
                profile.unlocked_count()
            );
            profile
        }
        Err(e) => {
            log::warn!("Save is malformed, using defaults: {e}");
            Profile::new()
        }
    }
}

/// Overwrite the save with the current profile
pub fn save_profile<S: KeyValueStore>(
    store: &mut S,
    profile: &Profile,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(profile)?;
    store.set(SAVE_KEY, &json)?;
    log::debug!("Profile saved ({} bytes)", json.len());
    Ok(())
}

/// Remove the save entirely
pub fn clear_profile<S: KeyValueStore>(store: &mut S) -> Result<(), StorageError> {
    store.remove(SAVE_KEY)?;
    log::info!("Save cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::garage::StatKind;

    #[test]
    fn test_missing_save_is_fresh() {
        let store = MemoryStore::new();
        assert_eq!(load_profile(&store), Profile::new());
    }

    #[test]
    fn test_round_trip() {
        let mut store = MemoryStore::new();
        let mut profile = Profile::new();
        profile.upgrade_stat("lada", StatKind::Speed).unwrap();
        profile.unlock_vehicle("zhiguli").unwrap();
        profile.activate_promo_code("NEONCITY").unwrap();
        profile.refresh_daily_tasks(12);
        profile.settings.set_sensitivity(90);
        profile.stats.total_distance = 1234.5;
        profile.last_admin_grant_ms = Some(42.0);
        profile.drain_unlocks();

        save_profile(&mut store, &profile).unwrap();
        assert_eq!(load_profile(&store), profile);
    }

    #[test]
    fn test_malformed_save_is_fresh() {
        let mut store = MemoryStore::new();
        store.set(SAVE_KEY, "{not json").unwrap();
        assert_eq!(load_profile(&store), Profile::new());
    }

    #[test]
    fn test_old_save_gets_defaults() {
        let mut store = MemoryStore::new();
        // First-build save: no skins, categories, tasks or admin fields
        let old = r#"{
            "vehicles": [
                {"id": "uaz", "name": "UAZ Hunter",
                 "speed": 45, "handling": 30, "acceleration": 40,
                 "max_speed": 100, "max_handling": 100, "max_acceleration": 100,
                 "price": 0, "unlocked": true},
                {"id": "lada", "name": "Lada 2107",
                 "speed": 65, "handling": 50, "acceleration": 60,
                 "max_speed": 100, "max_handling": 100, "max_acceleration": 100,
                 "price": 2000, "unlocked": true}
            ],
            "credits": 1234,
            "selected_vehicle": "lada",
            "settings": {"music": 10, "sfx": 20, "sensitivity": 30}
        }"#;
        store.set(SAVE_KEY, old).unwrap();

        let profile = load_profile(&store);
        assert_eq!(profile.credits, 1234);
        assert_eq!(profile.vehicle("lada").unwrap().speed, 65);
        assert_eq!(profile.vehicles.len(), 7);
        assert!(profile.vehicles.iter().all(|v| !v.skins.is_empty()));
        assert_eq!(profile.settings.sfx, 20);
        assert_eq!(profile.achievements.len(), 9);
        assert!(!profile.admin_mode);
        assert!(profile.used_promo_codes.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut store = MemoryStore::new();
        save_profile(&mut store, &Profile::new()).unwrap();
        assert_eq!(store.len(), 1);
        clear_profile(&mut store).unwrap();
        assert!(store.is_empty());
    }

    /// Reads work, every write and delete is refused
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key)
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::WriteRejected {
                key: key.to_string(),
            })
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            Err(StorageError::RemoveRejected {
                key: key.to_string(),
            })
        }
    }

    #[test]
    fn test_failed_clear_is_reported() {
        let mut inner = MemoryStore::new();
        save_profile(&mut inner, &Profile::new()).unwrap();
        let mut store = ReadOnlyStore(inner);

        let err = clear_profile(&mut store).unwrap_err();
        assert!(matches!(err, StorageError::RemoveRejected { ref key } if key == SAVE_KEY));
        assert!(store.get(SAVE_KEY).is_some());
        assert!(save_profile(&mut store, &Profile::new()).is_err());
    }
}
