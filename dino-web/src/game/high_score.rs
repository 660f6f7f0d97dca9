//! High score persistence seam
//!
//! The browser build stores the value in `localStorage`; tests use the
//! in-memory store.

use std::cell::Cell;
use std::rc::Rc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Failed to read high score: {0}")]
    Read(String),
    #[error("Failed to write high score: {0}")]
    Write(String),
}

impl From<StorageError> for wasm_bindgen::JsValue {
    fn from(err: StorageError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

/// A single durable integer slot
pub trait HighScoreStore {
    /// Stored value, `Ok(None)` when nothing was saved yet
    fn load(&self) -> Result<Option<u32>, StorageError>;
    fn save(&mut self, score: u32) -> Result<(), StorageError>;
}

/// Parse a stored value; garbage reads as "nothing stored"
pub fn parse_stored_score(raw: &str) -> Option<u32> {
    raw.trim().parse().ok()
}

/// In-memory store. Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slot: Rc<Cell<Option<u32>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u32) -> Self {
        let store = Self::new();
        store.slot.set(Some(score));
        store
    }

    pub fn get(&self) -> Option<u32> {
        self.slot.get()
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<u32>, StorageError> {
        Ok(self.slot.get())
    }

    fn save(&mut self, score: u32) -> Result<(), StorageError> {
        self.slot.set(Some(score));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stored_score() {
        assert_eq!(parse_stored_score("01234"), Some(1234));
        assert_eq!(parse_stored_score(" 42\n"), Some(42));
        assert_eq!(parse_stored_score("NaN"), None);
        assert_eq!(parse_stored_score("-5"), None);
    }

    #[test]
    fn test_memory_store_clones_share_slot() {
        let store = MemoryStore::new();
        let mut writer = store.clone();
        writer.save(77).unwrap();
        assert_eq!(store.get(), Some(77));
    }
}
