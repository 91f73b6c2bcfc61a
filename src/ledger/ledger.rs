use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::billing::{BillId, SubmittedBill};
use crate::domain::{Entry, Project};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub bills: Vec<SubmittedBill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_project: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Ledger {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            projects: Vec::new(),
            entries: Vec::new(),
            bills: Vec::new(),
            selected_project: None,
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn project(&self, id: Uuid) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.selected_project.and_then(|id| self.project(id))
    }

    pub fn entry(&self, id: Uuid) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn entries_for(&self, project_id: Uuid) -> impl Iterator<Item = &Entry> {
        self.entries
            .iter()
            .filter(move |entry| entry.project_id == project_id)
    }

    pub fn bill(&self, id: BillId) -> Option<&SubmittedBill> {
        self.bills.iter().find(|bill| bill.id == id)
    }

    pub fn bill_by_number(&self, number: &str) -> Option<&SubmittedBill> {
        let wanted = number.trim();
        self.bills
            .iter()
            .find(|bill| bill.bill.bill_number().eq_ignore_ascii_case(wanted))
    }

    /// Looks a bill up by id first, then by bill number.
    pub fn find_bill(&self, key: &str) -> Option<&SubmittedBill> {
        match Uuid::parse_str(key.trim()) {
            Ok(id) => self.bill(BillId(id)),
            Err(_) => self.bill_by_number(key),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
