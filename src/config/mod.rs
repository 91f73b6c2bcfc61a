use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::billing::{default_terms_and_conditions, BillDraft, CompanyDetails};
use crate::currency::{CurrencyCode, DateFormatStyle, LocaleConfig};
use crate::errors::{Result, TallyError};
use crate::utils::fs::{backup_file_name, list_backup_files, write_atomic, write_file};
use crate::utils::paths::{ensure_dir, PathResolver};

pub const DEFAULT_BACKUP_RETENTION: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default)]
    pub date_format: DateFormatStyle,
    #[serde(default)]
    pub company: CompanyDetails,
    #[serde(default = "default_terms_and_conditions")]
    pub default_terms: Vec<String>,
    #[serde(default = "default_retention")]
    pub backup_retention: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_opened_ledger: Option<String>,
}

fn default_retention() -> usize {
    DEFAULT_BACKUP_RETENTION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-IN".into(),
            currency: "INR".into(),
            date_format: DateFormatStyle::default(),
            company: CompanyDetails::default(),
            default_terms: default_terms_and_conditions(),
            backup_retention: DEFAULT_BACKUP_RETENTION,
            last_opened_ledger: None,
        }
    }
}

impl Config {
    pub fn locale_config(&self) -> LocaleConfig {
        LocaleConfig {
            date_format: self.date_format,
            ..LocaleConfig::for_tag(&self.locale)
        }
    }

    pub fn currency_code(&self) -> CurrencyCode {
        CurrencyCode::new(self.currency.clone())
    }

    /// Fresh draft carrying this configuration's letterhead and clauses.
    pub fn new_draft(&self, bill_date: chrono::NaiveDate) -> BillDraft {
        BillDraft::new(self.company.clone(), self.default_terms.clone(), bill_date)
    }

    /// Applies a `key = value` change from the shell.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key.to_ascii_lowercase().as_str() {
            "locale" => self.locale = non_empty(key, value)?,
            "currency" => self.currency = non_empty(key, value)?.to_uppercase(),
            "date_format" => {
                self.date_format = DateFormatStyle::from_name(value).ok_or_else(|| {
                    TallyError::Config(format!(
                        "date_format must be one of {}, got `{value}`",
                        DateFormatStyle::NAMES.join(", ")
                    ))
                })?
            }
            "company.name" => self.company.name = non_empty(key, value)?,
            "company.address" => self.company.address = non_empty(key, value)?,
            "company.phones" => {
                self.company.phones = value
                    .split(',')
                    .map(str::trim)
                    .filter(|phone| !phone.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            "backup_retention" => {
                let parsed: usize = value.parse().map_err(|_| {
                    TallyError::Config(format!("backup_retention must be a whole number, got `{value}`"))
                })?;
                self.backup_retention = parsed.max(1);
            }
            other => {
                return Err(TallyError::Config(format!(
                    "unknown setting `{other}` (expected one of: {})",
                    Self::KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }

    pub const KEYS: [&'static str; 7] = [
        "locale",
        "currency",
        "date_format",
        "company.name",
        "company.address",
        "company.phones",
        "backup_retention",
    ];
}

fn non_empty(key: &str, value: &str) -> Result<String> {
    if value.is_empty() {
        Err(TallyError::Config(format!("`{key}` must not be empty")))
    } else {
        Ok(value.to_string())
    }
}

pub struct ConfigManager {
    path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        let backups_dir = PathResolver::config_backup_dir_in(&base);
        ensure_dir(&backups_dir)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            backups_dir,
        })
    }

    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        tracing::debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn backup(&self, config: &Config, note: Option<&str>) -> Result<String> {
        ensure_dir(&self.backups_dir)?;
        let name = backup_file_name("config", note);
        let json = serde_json::to_string_pretty(config)?;
        write_file(&self.backups_dir.join(&name), &json)?;
        tracing::info!(backup = %name, "configuration backup created");
        Ok(name)
    }

    pub fn restore(&self, backup_name: &str) -> Result<Config> {
        let path = self.backups_dir.join(backup_name);
        if !path.exists() {
            return Err(TallyError::NotFound(format!(
                "configuration backup `{}`",
                backup_name
            )));
        }
        let data = fs::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&data)?;
        self.save(&config)?;
        Ok(config)
    }

    pub fn list_backups(&self) -> Result<Vec<String>> {
        list_backup_files(&self.backups_dir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
