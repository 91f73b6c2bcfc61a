mod common;

use tally_core::{
    core::services::{EntryService, ServiceError},
    domain::{EntryKind, Session},
    errors::{TallyError, ValidationError},
    voice::VoiceParser,
};

use common::{day, sample_ledger};

#[test]
fn earn_sentence_becomes_income_patch() {
    let patch = VoiceParser::parse("Earn 1200 from rent of the flat");
    assert_eq!(patch.kind, Some(EntryKind::Income));
    assert_eq!(patch.amount, Some(1_200.0));
    assert_eq!(patch.category.as_deref(), Some("rent"));
    assert_eq!(patch.description.as_deref(), Some("from of the flat"));
}

#[test]
fn income_keywords_win_over_expense_keywords() {
    let patch = VoiceParser::parse("expense report shows salary 900");
    assert_eq!(patch.kind, Some(EntryKind::Income));
    assert_eq!(patch.category.as_deref(), Some("salary"));
}

#[test]
fn earlier_category_in_list_wins() {
    let patch = VoiceParser::parse("spend 80 on food and groceries");
    assert_eq!(patch.category.as_deref(), Some("groceries"));
    assert_eq!(patch.description.as_deref(), Some("on food and"));
}

#[test]
fn transcript_without_amount_keeps_amount_empty() {
    let patch = VoiceParser::parse("bought medical supplies");
    assert_eq!(patch.amount, None);
    assert_eq!(patch.kind, None);
    assert_eq!(patch.category.as_deref(), Some("medical"));
    assert_eq!(patch.description.as_deref(), Some("bought supplies"));
}

#[test]
fn transcript_is_recorded_against_selected_project() {
    let mut ledger = sample_ledger();
    let session = Session::new("ravi").unwrap();
    let (id, patch) = EntryService::add_from_transcript(
        &mut ledger,
        Some(&session),
        None,
        "Spend 300 on transport",
        day(2024, 3, 10),
    )
    .unwrap();

    assert_eq!(patch.amount, Some(300.0));
    let entry = ledger.entries.iter().find(|entry| entry.id == id).unwrap();
    assert_eq!(entry.kind, EntryKind::Expense);
    assert_eq!(entry.amount, 300.0);
    assert_eq!(entry.category, "transport");
    assert_eq!(entry.description, "on");
    assert_eq!(entry.user_id, "ravi");
    assert_eq!(entry.date, day(2024, 3, 10));
    assert_eq!(Some(entry.project_id), ledger.selected_project);
}

#[test]
fn arabic_indic_digit_before_amount_is_skipped() {
    let mut ledger = sample_ledger();
    let session = Session::new("ravi").unwrap();
    let (id, patch) = EntryService::add_from_transcript(
        &mut ledger,
        Some(&session),
        None,
        "spend ٣ then 450 on food",
        day(2024, 3, 11),
    )
    .unwrap();

    assert_eq!(patch.amount, Some(450.0));
    let entry = ledger.entries.iter().find(|entry| entry.id == id).unwrap();
    assert_eq!(entry.amount, 450.0);
    assert_eq!(entry.category, "food");
}

#[test]
fn transcript_without_amount_is_not_recorded() {
    let mut ledger = sample_ledger();
    let session = Session::new("ravi").unwrap();
    let before = ledger.entries.len();
    let result = EntryService::add_from_transcript(
        &mut ledger,
        Some(&session),
        None,
        "some food",
        day(2024, 3, 10),
    );
    assert!(result.is_err());
    assert_eq!(ledger.entries.len(), before);
}

#[test]
fn transcript_requires_session() {
    let mut ledger = sample_ledger();
    let err = EntryService::add_from_transcript(&mut ledger, None, None, "earn 10", day(2024, 3, 10))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Core(TallyError::Validation(ValidationError::MissingSession))
    ));
}
