#![doc(test(attr(deny(warnings))))]

//! Tally Core keeps project income and expense ledgers and prices interior
//! design estimates: line items, payment schedules and printable bills.

pub mod billing;
pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;
pub mod voice;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Tally Core tracing initialized.");
    });
}
