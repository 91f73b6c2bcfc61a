//! Interactive and scripted shell over the ledger, billing and config layers.

pub mod commands;
pub mod core;
pub mod help;
pub mod io;
pub mod output;
pub mod registry;
pub mod shell;

pub use shell::run_cli;
