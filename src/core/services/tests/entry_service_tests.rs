use uuid::Uuid;

use super::{day, ledger, session};
use crate::core::filters::{DateRange, EntryFilter};
use crate::core::services::{EntryService, ProjectService, ServiceError};
use crate::domain::{EntryForm, EntryKind, EntryPatch};
use crate::errors::{TallyError, ValidationError};

fn form(amount: &str, kind: EntryKind) -> EntryForm {
    EntryForm {
        kind,
        amount: amount.into(),
        ..EntryForm::default()
    }
}

#[test]
fn add_requires_session_and_project() {
    let mut ledger = ledger();
    let err = EntryService::add(&mut ledger, None, None, form("5", EntryKind::Income), day(2024, 1, 1))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Core(TallyError::Validation(ValidationError::MissingSession))
    ));

    let err = EntryService::add(
        &mut ledger,
        Some(&session()),
        None,
        form("5", EntryKind::Income),
        day(2024, 1, 1),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Core(TallyError::Validation(ValidationError::MissingProject))
    ));

    let err = EntryService::add(
        &mut ledger,
        Some(&session()),
        Some(Uuid::new_v4()),
        form("5", EntryKind::Income),
        day(2024, 1, 1),
    )
    .unwrap_err();
    assert!(matches!(err, ServiceError::Core(TallyError::NotFound(_))));
    assert!(ledger.entries.is_empty());
}

#[test]
fn update_applies_patch_and_rejects_negative_amounts() {
    let mut ledger = ledger();
    let asha = session();
    let project = ProjectService::add(&mut ledger, &asha, "Villa").unwrap();
    let id = EntryService::add(
        &mut ledger,
        Some(&asha),
        Some(project),
        form("100", EntryKind::Expense),
        day(2024, 1, 1),
    )
    .unwrap();

    let patch = EntryPatch {
        category: Some("food".into()),
        ..EntryPatch::default()
    };
    EntryService::update(&mut ledger, id, &patch).unwrap();
    assert_eq!(ledger.entry(id).unwrap().category, "food");

    let bad = EntryPatch {
        amount: Some(-3.0),
        ..EntryPatch::default()
    };
    assert!(EntryService::update(&mut ledger, id, &bad).is_err());
    assert_eq!(ledger.entry(id).unwrap().amount, 100.0);
}

#[test]
fn transcript_entries_use_the_selected_project() {
    let mut ledger = ledger();
    let asha = session();
    let project = ProjectService::add(&mut ledger, &asha, "Villa").unwrap();
    ProjectService::select(&mut ledger, project).unwrap();

    let (id, patch) = EntryService::add_from_transcript(
        &mut ledger,
        Some(&asha),
        None,
        "spend 250 on food",
        day(2024, 2, 1),
    )
    .unwrap();
    assert_eq!(patch.kind, Some(EntryKind::Expense));
    let entry = ledger.entry(id).unwrap();
    assert_eq!(entry.amount, 250.0);
    assert_eq!(entry.category, "food");
    assert_eq!(entry.project_id, project);
    assert_eq!(entry.user_id, "asha");
}

#[test]
fn transcript_without_amount_is_rejected() {
    let mut ledger = ledger();
    let asha = session();
    let project = ProjectService::add(&mut ledger, &asha, "Villa").unwrap();
    let err = EntryService::add_from_transcript(
        &mut ledger,
        Some(&asha),
        Some(project),
        "bought groceries",
        day(2024, 2, 1),
    )
    .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn list_is_newest_first_and_filterable() {
    let mut ledger = ledger();
    let asha = session();
    let project = ProjectService::add(&mut ledger, &asha, "Villa").unwrap();
    for (amount, date) in [("1", day(2024, 1, 1)), ("2", day(2024, 3, 1)), ("3", day(2024, 2, 1))] {
        EntryService::add(
            &mut ledger,
            Some(&asha),
            Some(project),
            form(amount, EntryKind::Expense),
            date,
        )
        .unwrap();
    }
    let amounts: Vec<f64> = EntryService::list(&ledger, project)
        .iter()
        .map(|entry| entry.amount)
        .collect();
    assert_eq!(amounts, vec![2.0, 3.0, 1.0]);

    let filter = EntryFilter::default().with_range(DateRange::ThisMonth);
    let hits = EntryService::filtered(&ledger, project, &filter, day(2024, 3, 15));
    assert_eq!(hits.len(), 1);
}

#[test]
fn remove_and_resolve_prefix() {
    let mut ledger = ledger();
    let asha = session();
    let project = ProjectService::add(&mut ledger, &asha, "Villa").unwrap();
    let id = EntryService::add(
        &mut ledger,
        Some(&asha),
        Some(project),
        form("9", EntryKind::Income),
        day(2024, 1, 1),
    )
    .unwrap();
    let prefix = &id.to_string()[..8];
    assert_eq!(EntryService::resolve_id(&ledger, prefix).unwrap(), id);
    EntryService::remove(&mut ledger, id).unwrap();
    assert!(EntryService::remove(&mut ledger, id).is_err());
}
