//! Ledger collection, its persistence round-trip, and the calendar rules used
//! to slice it by day, week, and month.

pub mod calendar;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod store;

pub use calendar::CalendarContext;
pub use ledger::Ledger;
pub use store::{load_ledger, save_ledger, LedgerStore, LEDGER_KEY};
