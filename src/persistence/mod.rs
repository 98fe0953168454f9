//! Key/value persistence
//!
//! Features:
//! - `KeyValueStore` seam so leaderboard and settings code runs natively in tests
//! - LocalStorage backend on wasm, in-memory backend everywhere
//! - JSON helpers that fall back to defaults on missing or corrupt data

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

#[cfg(target_arch = "wasm32")]
mod local;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

/// Storage failure
#[derive(Debug)]
pub enum StoreError {
    /// No storage backend (private browsing, no window)
    Unavailable,
    /// Backend rejected the operation (quota, security)
    Backend(String),
    /// Value could not be encoded
    Encode(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::Backend(msg) => write!(f, "storage backend error: {msg}"),
            Self::Encode(err) => write!(f, "failed to encode value: {err}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encode(err)
    }
}

/// String key/value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read and decode a JSON value; anything unreadable yields `T::default()`
pub fn load_json<T: DeserializeOwned + Default>(store: &dyn KeyValueStore, key: &str) -> T {
    let json = match store.get(key) {
        Ok(Some(json)) => json,
        Ok(None) => return T::default(),
        Err(err) => {
            log::warn!("Could not read '{}': {}", key, err);
            return T::default();
        }
    };

    match serde_json::from_str(&json) {
        Ok(value) => value,
        Err(err) => {
            log::warn!("Discarding malformed '{}': {}", key, err);
            T::default()
        }
    }
}

/// Encode and write a JSON value
pub fn save_json<T: Serialize + ?Sized>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Store whose reads always fail
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable)
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Backend("quota exceeded".into()))
        }
    }

    #[test]
    fn test_memory_store_set_get() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.set("k", "w").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("w"));
    }

    #[test]
    fn test_load_json_defaults() {
        let mut store = MemoryStore::new();
        let missing: Vec<u32> = load_json(&store, "nums");
        assert!(missing.is_empty());

        store.set("nums", "[1, 2,").unwrap();
        let corrupt: Vec<u32> = load_json(&store, "nums");
        assert!(corrupt.is_empty());

        save_json(&mut store, "nums", &vec![1u32, 2, 3]).unwrap();
        let ok: Vec<u32> = load_json(&store, "nums");
        assert_eq!(ok, vec![1, 2, 3]);
    }

    #[test]
    fn test_broken_backend() {
        let mut store = BrokenStore;
        let value: Vec<u32> = load_json(&store, "nums");
        assert!(value.is_empty());

        let err = save_json(&mut store, "nums", &vec![1u32]).unwrap_err();
        assert_eq!(err.to_string(), "storage backend error: quota exceeded");
    }
}
