use std::{collections::BTreeMap, sync::Mutex};

use repwise_domain::{KeyValueStore, StorageError};

/// Key-value store without persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.lock()?.keys().cloned().collect())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|err| StorageError::Other(err.to_string().into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_read_write_remove() {
        let store = MemoryStore::new();

        assert_eq!(store.read("goal").unwrap(), None);

        store.write("goal", "\"endurance\"").unwrap();
        store.write("goal", "\"maintain\"").unwrap();
        store.write("body weight", "72.5").unwrap();

        assert_eq!(store.read("goal").unwrap().as_deref(), Some("\"maintain\""));
        assert_eq!(store.keys().unwrap(), vec!["body weight", "goal"]);

        store.remove("goal").unwrap();
        store.remove("goal").unwrap();

        assert_eq!(store.read("goal").unwrap(), None);
    }
}
