use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use serde_json::Value;

use super::{KeyValueStore, Result};
use crate::errors::LedgerError;

/// Process-local store, handy for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> Result<MutexGuard<'_, BTreeMap<String, Value>>> {
        self.values
            .lock()
            .map_err(|_| LedgerError::Storage("memory store lock poisoned".into()))
    }

    pub fn keys(&self) -> Result<Vec<String>> {
        Ok(self.values()?.keys().cloned().collect())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        self.values()?.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values()?.remove(key);
        Ok(())
    }
}
