mod entry_service_tests;

use chrono::NaiveDate;

use crate::domain::Session;
use crate::ledger::Ledger;

pub(super) fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(super) fn session() -> Session {
    Session::new("asha").unwrap()
}

pub(super) fn ledger() -> Ledger {
    Ledger::new("Test")
}
