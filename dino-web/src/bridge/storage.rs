//! High score slot in the browser's localStorage

use crate::game::{parse_stored_score, HighScoreStore, StorageError};

pub struct LocalStorageStore {
    storage: web_sys::Storage,
    key: String,
}

impl LocalStorageStore {
    pub fn open(key: &str) -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".into()))?;
        Ok(Self {
            storage,
            key: key.to_string(),
        })
    }
}

impl HighScoreStore for LocalStorageStore {
    fn load(&self) -> Result<Option<u32>, StorageError> {
        let raw = self
            .storage
            .get_item(&self.key)
            .map_err(|e| StorageError::Read(format!("{:?}", e)))?;
        Ok(raw.as_deref().and_then(parse_stored_score))
    }

    fn save(&mut self, score: u32) -> Result<(), StorageError> {
        self.storage
            .set_item(&self.key, &score.to_string())
            .map_err(|e| StorageError::Write(format!("{:?}", e)))
    }
}
