//! Key-value persistence used for the ledger blob and the user settings.

pub mod json_store;
pub mod memory;
pub mod settings;

use serde_json::Value;

use crate::errors::LedgerError;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Abstraction over a small key-value settings store.
///
/// `set` must replace the stored value atomically: readers observe either the
/// previous value or the new one, never a partial write.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn set(&self, key: &str, value: &Value) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

pub use json_store::JsonFileStore;
pub use memory::MemoryStore;
pub use settings::{
    load_settings, save_settings, NOTIFICATION_EMAILS_KEY, SELECTED_CATEGORY_KEY,
    SPENDING_LIMIT_KEY,
};
