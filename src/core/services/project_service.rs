//! Validated project mutations.

use uuid::Uuid;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{common::require_text, Project, Session};
use crate::errors::TallyError;
use crate::ledger::Ledger;

pub struct ProjectService;

impl ProjectService {
    /// Creates a project owned by the session user. Names are unique per
    /// owner, ignoring case.
    pub fn add(ledger: &mut Ledger, session: &Session, name: &str) -> ServiceResult<Uuid> {
        let name = require_text("project name", name)?;
        let normalized = name.to_lowercase();
        let duplicate = ledger.projects.iter().any(|project| {
            project.owner == session.user_id && project.name.trim().to_lowercase() == normalized
        });
        if duplicate {
            return Err(ServiceError::Invalid(format!(
                "Project `{}` already exists",
                name
            )));
        }
        let project = Project::new(name, session.user_id.clone());
        let id = project.id;
        tracing::info!(project_id = %id, name = %project.name, "project created");
        ledger.projects.push(project);
        ledger.touch();
        Ok(id)
    }

    pub fn list<'a>(ledger: &'a Ledger, owner: &str) -> Vec<&'a Project> {
        let mut projects: Vec<&Project> = ledger
            .projects
            .iter()
            .filter(|project| project.owner == owner)
            .collect();
        projects.sort_by_key(|project| project.created_at);
        projects
    }

    /// Deletes a project together with its entries.
    pub fn remove(ledger: &mut Ledger, id: Uuid) -> ServiceResult<Project> {
        let position = ledger
            .projects
            .iter()
            .position(|project| project.id == id)
            .ok_or_else(|| TallyError::NotFound(format!("project {}", id)))?;
        let project = ledger.projects.remove(position);
        let before = ledger.entries.len();
        ledger.entries.retain(|entry| entry.project_id != id);
        if ledger.selected_project == Some(id) {
            ledger.selected_project = None;
        }
        ledger.touch();
        tracing::info!(
            project_id = %id,
            removed_entries = before - ledger.entries.len(),
            "project removed"
        );
        Ok(project)
    }

    pub fn select(ledger: &mut Ledger, id: Uuid) -> ServiceResult<()> {
        if ledger.project(id).is_none() {
            return Err(TallyError::NotFound(format!("project {}", id)).into());
        }
        ledger.selected_project = Some(id);
        ledger.touch();
        Ok(())
    }

    /// Finds a project by id or by case-insensitive name.
    pub fn resolve<'a>(ledger: &'a Ledger, key: &str) -> Option<&'a Project> {
        if let Ok(id) = Uuid::parse_str(key.trim()) {
            return ledger.project(id);
        }
        let wanted = key.trim().to_lowercase();
        ledger
            .projects
            .iter()
            .find(|project| project.name.to_lowercase() == wanted)
    }
}
