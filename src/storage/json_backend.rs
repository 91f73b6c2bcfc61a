use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    config::DEFAULT_BACKUP_RETENTION,
    errors::{Result, TallyError},
    ledger::Ledger,
    utils::{
        fs::{backup_file_name, canonical_name, list_backup_files, write_atomic, write_file},
        paths::{ensure_dir, PathResolver},
    },
};

use super::StorageBackend;

#[derive(Clone)]
pub struct JsonStorage {
    root: PathBuf,
    ledgers_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let app_root = PathResolver::resolve_base(root);
        ensure_dir(&app_root)?;
        let ledgers_dir = PathResolver::ledger_dir_in(&app_root);
        let backups_dir = PathResolver::backup_dir_in(&app_root);
        ensure_dir(&ledgers_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            root: app_root,
            ledgers_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_BACKUP_RETENTION).max(1),
        })
    }

    pub fn ledger_path(&self, name: &str) -> PathBuf {
        self.ledgers_dir
            .join(format!("{}.json", canonical_name(name)))
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    pub fn backup_path(&self, name: &str, backup_name: &str) -> PathBuf {
        self.backup_dir(name).join(backup_name)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let backup_path = dir.join(backup_file_name(&canonical_name(name), None));
        fs::copy(path, &backup_path)?;
        self.prune_backups(name)
    }

    fn prune_backups(&self, name: &str) -> Result<()> {
        let backups = self.list_backups(name)?;
        for entry in backups.iter().skip(self.retention) {
            let path = self.backup_path(name, entry);
            if let Err(err) = fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, ledger: &Ledger, name: &str) -> Result<()> {
        let path = self.ledger_path(name);
        self.backup_existing_file(name, &path)?;
        save_ledger_to_path(ledger, &path)?;
        tracing::info!(ledger = %name, path = %path.display(), "ledger saved");
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Ledger> {
        let path = self.ledger_path(name);
        if !path.exists() {
            return Err(TallyError::NotFound(format!("ledger `{}`", name)));
        }
        let ledger = load_ledger_from_path(&path)?;
        for warning in ledger_warnings(&ledger) {
            tracing::warn!(ledger = %name, "{warning}");
        }
        Ok(ledger)
    }

    fn list_ledgers(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.ledgers_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        list_backup_files(&self.backup_dir(name))
    }

    fn backup(&self, ledger: &Ledger, name: &str, note: Option<&str>) -> Result<String> {
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let file_name = backup_file_name(&canonical_name(name), note);
        let json = serde_json::to_string_pretty(ledger)?;
        write_file(&dir.join(&file_name), &json)?;
        self.prune_backups(name)?;
        tracing::info!(ledger = %name, backup = %file_name, "ledger backup created");
        Ok(file_name)
    }

    fn restore(&self, name: &str, backup_name: &str) -> Result<Ledger> {
        let backup_path = self.backup_path(name, backup_name);
        if !backup_path.exists() {
            return Err(TallyError::NotFound(format!("backup `{}`", backup_name)));
        }
        let ledger = load_ledger_from_path(&backup_path)?;
        let target = self.ledger_path(name);
        fs::copy(&backup_path, &target)?;
        Ok(ledger)
    }
}

pub fn save_ledger_to_path(ledger: &Ledger, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(ledger)?;
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    write_atomic(path, &json)
}

pub fn load_ledger_from_path(path: &Path) -> Result<Ledger> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Reports dangling references that loading tolerates but users should see.
pub fn ledger_warnings(ledger: &Ledger) -> Vec<String> {
    let project_ids: HashSet<_> = ledger.projects.iter().map(|p| p.id).collect();
    let mut warnings = Vec::new();
    for entry in &ledger.entries {
        if !project_ids.contains(&entry.project_id) {
            warnings.push(format!(
                "entry {} references unknown project {}",
                entry.id, entry.project_id
            ));
        }
    }
    if let Some(selected) = ledger.selected_project {
        if !project_ids.contains(&selected) {
            warnings.push(format!("selected project {} no longer exists", selected));
        }
    }
    let mut numbers = HashSet::new();
    for stored in &ledger.bills {
        if !numbers.insert(stored.bill.bill_number().to_lowercase()) {
            warnings.push(format!(
                "bill number {} appears more than once",
                stored.bill.bill_number()
            ));
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Entry, EntryKind, Project};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage =
            JsonStorage::new(Some(temp.path().to_path_buf()), Some(2)).expect("json storage");
        (storage, temp)
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        let mut ledger = Ledger::new("Sample");
        ledger.projects.push(Project::new("Villa", "asha"));
        storage.save(&ledger, "Household").expect("save ledger");
        let loaded = storage.load("household").expect("load ledger");
        assert_eq!(loaded.name, "Sample");
        assert_eq!(loaded.projects.len(), 1);
        assert_eq!(storage.list_ledgers().unwrap(), vec!["household".to_string()]);
    }

    #[test]
    fn missing_ledger_is_not_found() {
        let (storage, _guard) = storage_with_temp_dir();
        assert!(matches!(storage.load("nope"), Err(TallyError::NotFound(_))));
    }

    #[test]
    fn backups_are_pruned_to_retention() {
        let (storage, _guard) = storage_with_temp_dir();
        let ledger = Ledger::new("Sample");
        for note in ["one", "two", "three"] {
            storage.backup(&ledger, "site", Some(note)).expect("backup");
        }
        assert_eq!(storage.list_backups("site").unwrap().len(), 2);
    }

    #[test]
    fn warnings_flag_orphan_entries() {
        let mut ledger = Ledger::new("Sample");
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        ledger
            .entries
            .push(Entry::new(uuid::Uuid::new_v4(), "u", EntryKind::Expense, 5.0, day));
        let warnings = ledger_warnings(&ledger);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("unknown project"));
    }
}
