//! The persisted aggregate: projects, entries and submitted bills.

#[allow(clippy::module_inception)]
pub mod ledger;
pub mod sinks;

pub use ledger::Ledger;
pub use sinks::LedgerDocumentSink;
