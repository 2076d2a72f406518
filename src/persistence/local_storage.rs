//! Browser LocalStorage backend (WASM only)

use super::{BestScoreRecord, ScoreStore, StoreError};

/// Best scores under `<prefix>_<key>` in LocalStorage
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    prefix: String,
}

impl LocalStorageStore {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn item_key(&self, key: &str) -> String {
        format!("{}_{}", self.prefix, key)
    }

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StoreError::Unavailable("LocalStorage not available".into()))
    }

    fn write(&self, key: &str, value: u64) -> Result<(), StoreError> {
        let json = BestScoreRecord::encode(value)?;
        Self::storage()?
            .set_item(&self.item_key(key), &json)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }
}

impl ScoreStore for LocalStorageStore {
    fn load_best(&mut self, key: &str) -> Result<u64, StoreError> {
        let raw = Self::storage()?
            .get_item(&self.item_key(key))
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?;

        match raw.as_deref().and_then(BestScoreRecord::parse) {
            Some(best) => Ok(best),
            None => {
                if raw.is_some() {
                    log::warn!("Best score for '{}' is corrupt, resetting to 0", key);
                }
                if let Err(e) = self.write(key, 0) {
                    log::error!("Could not repair best score for '{}': {}", key, e);
                }
                Ok(0)
            }
        }
    }

    fn save_best(&mut self, key: &str, value: u64) -> Result<(), StoreError> {
        self.write(key, value)?;
        log::info!("Best score saved ({})", value);
        Ok(())
    }
}
