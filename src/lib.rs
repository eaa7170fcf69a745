#![doc(test(attr(deny(warnings))))]

//! Budget Buddy keeps a personal ledger of income and spending entries,
//! derives dashboard aggregates from it, and watches a weekly spending limit
//! for one category, raising an alert that can be mailed out when the limit
//! is exceeded.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod notify;
pub mod storage;
pub mod time;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budget Buddy tracing initialized.");
    });
}
