//! String-addressed key-value persistence used by the library.

use anyhow::Result;
use std::collections::HashMap;

/// Persistence interface for serialized library state
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Non-persistent store backed by a `HashMap`
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() -> Result<()> {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("anime_favorites")?, None);

        store.set("anime_favorites", "[]")?;
        assert_eq!(store.get("anime_favorites")?.as_deref(), Some("[]"));

        store.set("anime_favorites", "[1]")?;
        assert_eq!(store.get("anime_favorites")?.as_deref(), Some("[1]"));

        Ok(())
    }

    #[test]
    fn test_boxed_store() -> Result<()> {
        let mut store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        store.set("k", "v")?;
        assert_eq!(store.get("k")?.as_deref(), Some("v"));
        Ok(())
    }
}
