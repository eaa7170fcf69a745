use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::Entry;
use crate::errors::LedgerError;
use crate::ledger::Ledger;
use crate::storage::KeyValueStore;

/// Storage key holding the serialized entry array.
pub const LEDGER_KEY: &str = "spendingItems";

/// Reads the persisted ledger, falling back to an empty one when the blob is
/// missing or unreadable.
pub fn load_ledger(storage: &dyn KeyValueStore) -> Ledger {
    let value = match storage.get(LEDGER_KEY) {
        Ok(Some(value)) => value,
        Ok(None) => return Ledger::new(),
        Err(err) => {
            warn!(error = %err, "ledger blob unreadable; starting with an empty ledger");
            return Ledger::new();
        }
    };
    let entries: Vec<Entry> = match serde_json::from_value(value) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(error = %err, "ledger blob corrupt; starting with an empty ledger");
            return Ledger::new();
        }
    };
    match Ledger::from_entries(entries) {
        Ok(ledger) => {
            info!(entries = ledger.len(), "ledger loaded");
            ledger
        }
        Err(err) => {
            warn!(error = %err, "ledger blob inconsistent; starting with an empty ledger");
            Ledger::new()
        }
    }
}

/// Overwrites the persisted blob with the full ledger.
pub fn save_ledger(storage: &dyn KeyValueStore, ledger: &Ledger) -> Result<(), LedgerError> {
    let value = serde_json::to_value(ledger)?;
    storage.set(LEDGER_KEY, &value)?;
    info!(entries = ledger.len(), "ledger saved");
    Ok(())
}

/// A ledger bound to its storage: every mutation rewrites the whole blob.
pub struct LedgerStore {
    storage: Arc<dyn KeyValueStore>,
    ledger: Ledger,
}

impl LedgerStore {
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let ledger = load_ledger(storage.as_ref());
        Self { storage, ledger }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Appends and persists. On a storage failure the entry stays in memory
    /// and the error is returned.
    pub fn add(&mut self, entry: Entry) -> Result<Uuid, LedgerError> {
        let id = self.insert(entry)?;
        self.save()?;
        Ok(id)
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Entry, LedgerError> {
        let removed = self.take(id)?;
        self.save()?;
        Ok(removed)
    }

    /// Appends in memory only; pair with [`LedgerStore::save`].
    pub fn insert(&mut self, entry: Entry) -> Result<Uuid, LedgerError> {
        self.ledger.push(entry)
    }

    /// Removes in memory only; pair with [`LedgerStore::save`].
    pub fn take(&mut self, id: Uuid) -> Result<Entry, LedgerError> {
        self.ledger.remove(id)
    }

    pub fn save(&self) -> Result<(), LedgerError> {
        save_ledger(self.storage.as_ref(), &self.ledger)
    }

    /// Discards in-memory state and re-reads the persisted blob.
    pub fn reload(&mut self) {
        self.ledger = load_ledger(self.storage.as_ref());
    }
}
