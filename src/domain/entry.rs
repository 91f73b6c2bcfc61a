//! Income and expense entries recorded against a project.

use std::{fmt, str::FromStr};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::numeric::{coerce_amount, ensure_non_negative, parse_non_negative};
use crate::errors::ValidationError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum EntryKind {
    Income,
    #[default]
    Expense,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Income => "Income",
            EntryKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

impl FromStr for EntryKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(EntryKind::Income),
            "expense" => Ok(EntryKind::Expense),
            other => Err(ValidationError::UnknownEntryType(other.to_string())),
        }
    }
}

/// A single income or expense record.
///
/// Deserialization goes through [`RawEntry`], so records written by older
/// tools with missing or loosely typed fields load with safe defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawEntry")]
pub struct Entry {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: String,
    pub kind: EntryKind,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
}

impl Entry {
    pub fn new(
        project_id: Uuid,
        user_id: impl Into<String>,
        kind: EntryKind,
        amount: f64,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            user_id: user_id.into(),
            kind,
            amount,
            category: String::new(),
            description: String::new(),
            date,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Signed contribution to a balance: income adds, expenses subtract.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            EntryKind::Income => self.amount,
            EntryKind::Expense => -self.amount,
        }
    }
}

/// Loosely typed wire shape of an entry.
#[derive(Debug, Clone, Deserialize)]
struct RawEntry {
    #[serde(default)]
    id: Option<Uuid>,
    project_id: Uuid,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default, alias = "type")]
    kind: Option<String>,
    #[serde(default)]
    amount: Option<serde_json::Value>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    date: Option<NaiveDate>,
}

impl From<RawEntry> for Entry {
    fn from(raw: RawEntry) -> Self {
        let kind = raw
            .kind
            .as_deref()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();
        let amount = match raw.amount {
            Some(serde_json::Value::Number(number)) => number
                .as_f64()
                .filter(|value| value.is_finite())
                .unwrap_or(0.0),
            Some(serde_json::Value::String(text)) => coerce_amount(&text),
            _ => 0.0,
        };
        Self {
            id: raw.id.unwrap_or_else(Uuid::new_v4),
            project_id: raw.project_id,
            user_id: raw.user_id.unwrap_or_default(),
            kind,
            amount,
            category: raw.category.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            date: raw.date.unwrap_or_else(|| Utc::now().date_naive()),
        }
    }
}

/// Partial update where only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    pub kind: Option<EntryKind>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.date.is_none()
    }

    /// Checks the patch values without applying them.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(amount) = self.amount {
            ensure_non_negative("amount", amount)?;
        }
        Ok(())
    }

    pub fn apply_to(&self, entry: &mut Entry) {
        if let Some(kind) = self.kind {
            entry.kind = kind;
        }
        if let Some(amount) = self.amount {
            entry.amount = amount;
        }
        if let Some(category) = &self.category {
            entry.category = category.clone();
        }
        if let Some(description) = &self.description {
            entry.description = description.clone();
        }
        if let Some(date) = self.date {
            entry.date = date;
        }
    }
}

/// In-progress entry form; amounts stay textual until submission.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryForm {
    pub kind: EntryKind,
    pub amount: String,
    pub category: String,
    pub description: String,
    pub date: Option<NaiveDate>,
}

impl Default for EntryForm {
    fn default() -> Self {
        Self {
            kind: EntryKind::Income,
            amount: String::new(),
            category: String::new(),
            description: String::new(),
            date: None,
        }
    }
}

impl EntryForm {
    pub fn apply(&mut self, patch: &EntryPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount.to_string();
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(date) = patch.date {
            self.date = Some(date);
        }
    }

    /// Builds an entry, rejecting a missing or malformed amount.
    pub fn into_entry(
        self,
        project_id: Uuid,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<Entry, ValidationError> {
        let amount = parse_non_negative("amount", &self.amount)?;
        Ok(Entry {
            id: Uuid::new_v4(),
            project_id,
            user_id: user_id.to_string(),
            kind: self.kind,
            amount,
            category: self.category.trim().to_string(),
            description: self.description.trim().to_string(),
            date: self.date.unwrap_or(today),
        })
    }
}
