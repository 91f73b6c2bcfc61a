#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tally_core::{
    config::ConfigManager,
    domain::{Entry, EntryKind, Project},
    ledger::Ledger,
    storage::JsonStorage,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates isolated storage and config managers backed by a unique directory.
pub fn setup_test_env() -> (JsonStorage, ConfigManager) {
    let base = temp_base();
    let storage = JsonStorage::new(Some(base.clone()), Some(3)).expect("create json storage");
    let config_manager =
        ConfigManager::with_base_dir(base).expect("create config manager for temp dir");
    (storage, config_manager)
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Ledger with one project for `asha` holding a salary and two expenses.
pub fn sample_ledger() -> Ledger {
    let mut ledger = Ledger::new("Household");
    let project = Project::new("Villa", "asha");
    let project_id = project.id;
    ledger.projects.push(project);
    ledger.selected_project = Some(project_id);
    ledger.entries.push(
        Entry::new(project_id, "asha", EntryKind::Income, 50_000.0, day(2024, 1, 5))
            .with_category("salary"),
    );
    ledger.entries.push(
        Entry::new(project_id, "asha", EntryKind::Expense, 1_200.0, day(2024, 1, 9))
            .with_category("food")
            .with_description("weekly market"),
    );
    ledger.entries.push(
        Entry::new(project_id, "asha", EntryKind::Expense, 9_000.0, day(2024, 2, 1))
            .with_category("rent"),
    );
    ledger
}
