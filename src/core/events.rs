use std::sync::Mutex;

use uuid::Uuid;

use crate::core::budget_manager::DashboardSnapshot;
use crate::core::services::AlertResponse;

/// What changed in the ledger or settings.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerChange {
    EntryAdded(Uuid),
    EntryRemoved(Uuid),
    SettingsUpdated,
    AlertAnswered(AlertResponse),
}

/// Change notification carrying the recomputed dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEvent {
    pub change: LedgerChange,
    pub snapshot: DashboardSnapshot,
}

/// Receives ledger change events; presentation layers re-render from them.
pub trait LedgerEventSink: Send + Sync {
    fn emit(&self, event: &LedgerEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

impl LedgerEventSink for NoOpEventSink {
    fn emit(&self, _event: &LedgerEvent) {}
}

/// Keeps every emitted event in memory.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: Mutex<Vec<LedgerEvent>>,
}

impl CollectingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<LedgerEvent> {
        self.events
            .lock()
            .ok()
            .and_then(|events| events.last().cloned())
    }
}

impl LedgerEventSink for CollectingEventSink {
    fn emit(&self, event: &LedgerEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
