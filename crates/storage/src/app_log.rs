use std::collections::VecDeque;

use repwise_domain::{KEY_LOG, KeyValueStore, log};

/// Keeps the most recent log entries in a key-value store, newest first.
pub struct Log<S> {
    store: S,
}

impl<S> Log<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore + Send + Sync + 'static> log::Repository for Log<S> {
    fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        self.store
            .read_json::<VecDeque<log::Entry>>(KEY_LOG)
            .map(Option::unwrap_or_default)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        let mut entries = self.read_entries()?;
        entries.push_front(entry);
        entries.truncate(log::MAX_ENTRIES);
        self.store
            .write_json(KEY_LOG, &entries)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }
}
