pub mod budget_service;
pub mod summary_service;

pub use budget_service::{
    AlertDelivery, AlertMessage, AlertResponse, AlertState, BudgetService, BudgetStatus,
};
pub use summary_service::{EntryGroup, LedgerTotals, SummaryService, TimeBucket};
