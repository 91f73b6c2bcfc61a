pub mod json_backend;

use std::path::Path;

use crate::{errors::Result, ledger::Ledger};

/// Abstraction over persistence backends capable of storing ledgers and snapshots.
pub trait StorageBackend: Send + Sync {
    fn save(&self, ledger: &Ledger, name: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<Ledger>;
    fn list_ledgers(&self) -> Result<Vec<String>>;
    fn list_backups(&self, name: &str) -> Result<Vec<String>>;
    fn backup(&self, ledger: &Ledger, name: &str, note: Option<&str>) -> Result<String>;
    fn restore(&self, name: &str, backup_name: &str) -> Result<Ledger>;

    fn save_to_path(&self, ledger: &Ledger, path: &Path) -> Result<()> {
        json_backend::save_ledger_to_path(ledger, path)
    }

    fn load_from_path(&self, path: &Path) -> Result<Ledger> {
        json_backend::load_ledger_from_path(path)
    }
}

pub use json_backend::{ledger_warnings, JsonStorage};
