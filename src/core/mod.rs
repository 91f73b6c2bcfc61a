//! Validated operations over a loaded [`Ledger`](crate::ledger::Ledger).

pub mod filters;
pub mod services;

pub use filters::{DateRange, EntryFilter};
