#![allow(dead_code)]

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use budget_buddy::{
    core::BudgetManager,
    errors::LedgerError,
    notify::{Notifier, NotifyError},
    storage::{KeyValueStore, MemoryStore},
    time::FixedClock,
};
use serde_json::Value;
use chrono::{DateTime, FixedOffset, TimeZone};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentMail {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Notifier double that remembers every message, optionally failing each send.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<SentMail>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().expect("lock sent mail").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, recipients: &[String], subject: &str, body: &str) -> Result<(), NotifyError> {
        self.sent.lock().expect("lock sent mail").push(SentMail {
            recipients: recipients.to_vec(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        if self.fail {
            Err(NotifyError::Unavailable("mail not configured".into()))
        } else {
            Ok(())
        }
    }
}

/// In-memory store whose writes to one chosen key can be made to fail.
#[derive(Default)]
pub struct FailingStore {
    inner: MemoryStore,
    failing_key: Mutex<Option<String>>,
}

impl FailingStore {
    pub fn fail_writes_to(&self, key: &str) {
        *self.failing_key.lock().expect("lock failing key") = Some(key.to_string());
    }

    pub fn heal(&self) {
        *self.failing_key.lock().expect("lock failing key") = None;
    }

    fn check(&self, key: &str) -> Result<(), LedgerError> {
        match self.failing_key.lock().expect("lock failing key").as_deref() {
            Some(failing) if failing == key => {
                Err(LedgerError::Storage(format!("disk full while writing `{key}`")))
            }
            _ => Ok(()),
        }
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<Value>, LedgerError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), LedgerError> {
        self.check(key)?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), LedgerError> {
        self.check(key)?;
        self.inner.remove(key)
    }
}

/// Opens a manager over `storage` with the fixed Wednesday clock.
pub fn manager_over(storage: Arc<dyn KeyValueStore>, notifier: RecordingNotifier) -> BudgetManager {
    BudgetManager::open(
        storage,
        Box::new(FixedClock::new(wednesday_noon())),
        Box::new(notifier),
    )
}

/// Wednesday 2024-09-18 12:00 at UTC+00:00.
pub fn wednesday_noon() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 9, 18, 12, 0, 0)
        .unwrap()
}

pub struct Harness {
    pub manager: BudgetManager,
    pub storage: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
    pub notifier: RecordingNotifier,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_notifier(RecordingNotifier::default())
    }

    pub fn with_notifier(notifier: RecordingNotifier) -> Self {
        let storage = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(wednesday_noon()));
        let manager = BudgetManager::open(
            storage.clone(),
            Box::new(clock.clone()),
            Box::new(notifier.clone()),
        );
        Self {
            manager,
            storage,
            clock,
            notifier,
        }
    }

    /// Opens a second manager over the same storage, as an app restart would.
    pub fn reopen(&self) -> BudgetManager {
        BudgetManager::open(
            self.storage.clone(),
            Box::new(self.clock.clone()),
            Box::new(self.notifier.clone()),
        )
    }
}
