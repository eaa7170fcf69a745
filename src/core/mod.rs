//! Aggregation, budget evaluation, and the manager that ties them to the
//! persisted ledger and settings.

pub mod budget_manager;
pub mod events;
pub mod services;

pub use budget_manager::{AlertOutcome, BudgetManager, DashboardSnapshot};
pub use events::{CollectingEventSink, LedgerChange, LedgerEvent, LedgerEventSink, NoOpEventSink};
