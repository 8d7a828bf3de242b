use std::{rc::Rc, sync::Arc};

use serde::{Serialize, de::DeserializeOwned};

use crate::StorageError;

pub const KEY_LEARNED_PACE: &str = "learned pace";
pub const KEY_FAVORITE_EXERCISES: &str = "favorite exercises";
pub const KEY_GOAL: &str = "goal";
pub const KEY_BODY_WEIGHT: &str = "body weight";
pub const KEY_SETTINGS: &str = "settings";
pub const KEY_LOG: &str = "log";

/// Flat string store persisted across launches. Writes are last-write-wins.
pub trait KeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError>
    where
        Self: Sized,
    {
        match self.read(key)? {
            Some(value) => serde_json::from_str(&value)
                .map(Some)
                .map_err(|_| StorageError::Corrupt(key.to_string())),
            None => Ok(None),
        }
    }

    fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError>
    where
        Self: Sized,
    {
        let value = serde_json::to_string(value).map_err(|err| StorageError::Other(err.into()))?;
        self.write(key, &value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{cell::RefCell, collections::BTreeMap};

    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default)]
    pub(crate) struct TestStore {
        pub entries: RefCell<BTreeMap<String, String>>,
        pub fail_writes: bool,
    }

    impl TestStore {
        pub fn failing() -> Self {
            Self {
                entries: RefCell::new(BTreeMap::new()),
                fail_writes: true,
            }
        }
    }

    impl KeyValueStore for TestStore {
        fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.entries.borrow().get(key).cloned())
        }

        fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.fail_writes {
                return Err(StorageError::Other("disk full".into()));
            }
            self.entries
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.entries.borrow_mut().remove(key);
            Ok(())
        }
    }

    #[test]
    fn test_json_round_trip_through_reference() {
        let store = TestStore::default();
        let by_ref = &store;

        by_ref.write_json(KEY_BODY_WEIGHT, &72.5_f32).unwrap();

        assert_eq!(store.read_json::<f32>(KEY_BODY_WEIGHT).unwrap(), Some(72.5));
        assert_eq!(store.read_json::<f32>(KEY_GOAL).unwrap(), None);
    }

    #[test]
    fn test_read_json_corrupt() {
        let store = TestStore::default();
        store.write(KEY_SETTINGS, "{not json").unwrap();

        assert!(matches!(
            store.read_json::<Vec<u32>>(KEY_SETTINGS),
            Err(StorageError::Corrupt(key)) if key == KEY_SETTINGS
        ));
    }

    #[test]
    fn test_shared_store() {
        let store = Rc::new(TestStore::default());
        let other = Rc::clone(&store);

        store.write(KEY_GOAL, "\"Endurance\"").unwrap();

        assert_eq!(
            other.read(KEY_GOAL).unwrap(),
            Some("\"Endurance\"".to_string())
        );

        other.remove(KEY_GOAL).unwrap();

        assert_eq!(store.read(KEY_GOAL).unwrap(), None);
    }
}
