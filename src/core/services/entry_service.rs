//! Validated entry mutations.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::core::filters::EntryFilter;
use crate::core::services::ServiceResult;
use crate::domain::{Entry, EntryForm, EntryPatch, Session};
use crate::errors::{TallyError, ValidationError};
use crate::ledger::Ledger;
use crate::voice::VoiceParser;

pub struct EntryService;

impl EntryService {
    /// Records `form` against `project`, or the selected project when `None`.
    pub fn add(
        ledger: &mut Ledger,
        session: Option<&Session>,
        project: Option<Uuid>,
        form: EntryForm,
        today: NaiveDate,
    ) -> ServiceResult<Uuid> {
        let session = Session::require(session)?;
        let project_id = Self::target_project(ledger, project)?;
        let entry = form.into_entry(project_id, &session.user_id, today)?;
        let id = entry.id;
        tracing::info!(
            entry_id = %id,
            project_id = %project_id,
            kind = %entry.kind,
            amount = entry.amount,
            "entry recorded"
        );
        ledger.entries.push(entry);
        ledger.touch();
        Ok(id)
    }

    /// Parses a transcript, fills an empty form with it and records the result.
    pub fn add_from_transcript(
        ledger: &mut Ledger,
        session: Option<&Session>,
        project: Option<Uuid>,
        transcript: &str,
        today: NaiveDate,
    ) -> ServiceResult<(Uuid, EntryPatch)> {
        let patch = VoiceParser::parse(transcript);
        let mut form = EntryForm::default();
        form.apply(&patch);
        let id = Self::add(ledger, session, project, form, today)?;
        Ok((id, patch))
    }

    pub fn update(ledger: &mut Ledger, id: Uuid, patch: &EntryPatch) -> ServiceResult<()> {
        patch.validate()?;
        let entry = ledger
            .entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| TallyError::NotFound(format!("entry {}", id)))?;
        patch.apply_to(entry);
        ledger.touch();
        Ok(())
    }

    pub fn remove(ledger: &mut Ledger, id: Uuid) -> ServiceResult<Entry> {
        let position = ledger
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| TallyError::NotFound(format!("entry {}", id)))?;
        let entry = ledger.entries.remove(position);
        ledger.touch();
        Ok(entry)
    }

    /// Entries of a project, newest first.
    pub fn list(ledger: &Ledger, project_id: Uuid) -> Vec<&Entry> {
        let mut entries: Vec<&Entry> = ledger.entries_for(project_id).collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries
    }

    pub fn filtered<'a>(
        ledger: &'a Ledger,
        project_id: Uuid,
        filter: &EntryFilter,
        reference: NaiveDate,
    ) -> Vec<&'a Entry> {
        filter.apply(Self::list(ledger, project_id), reference)
    }

    /// Accepts a full id or a unique prefix of one.
    pub fn resolve_id(ledger: &Ledger, key: &str) -> ServiceResult<Uuid> {
        let key = key.trim().to_lowercase();
        if let Ok(id) = Uuid::parse_str(&key) {
            return Ok(id);
        }
        let matches: Vec<Uuid> = ledger
            .entries
            .iter()
            .map(|entry| entry.id)
            .filter(|id| id.to_string().starts_with(&key))
            .collect();
        match matches.as_slice() {
            [only] => Ok(*only),
            [] => Err(TallyError::NotFound(format!("entry `{}`", key)).into()),
            _ => Err(ValidationError::Other(format!("entry prefix `{}` is ambiguous", key)).into()),
        }
    }

    fn target_project(ledger: &Ledger, explicit: Option<Uuid>) -> ServiceResult<Uuid> {
        let id = explicit
            .or(ledger.selected_project)
            .ok_or(ValidationError::MissingProject)?;
        if ledger.project(id).is_none() {
            return Err(TallyError::NotFound(format!("project {}", id)).into());
        }
        Ok(id)
    }
}
