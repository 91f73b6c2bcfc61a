mod common;

use assert_fs::prelude::*;
use assert_fs::TempDir;
use chrono::NaiveDate;
use predicates::prelude::*;
use tally_core::{
    billing::{BillDraft, ItemField},
    config::Config,
    core::services::{BillingService, SummaryService},
    domain::{EntryKind, Session},
    ledger::Ledger,
    storage::{JsonStorage, StorageBackend},
};

use common::{sample_ledger, setup_test_env};

fn submitted_ledger() -> Ledger {
    let mut ledger = sample_ledger();
    let mut draft = BillDraft::with_defaults(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    draft.set_bill_number("B-7").unwrap();
    draft.set_customer_name("Lakshmi").unwrap();
    draft.set_item_field(0, ItemField::Particular, "Wardrobe").unwrap();
    draft.set_item_field(0, ItemField::Width, "10").unwrap();
    draft.set_item_field(0, ItemField::Height, "5").unwrap();
    let session = Session::new("asha").unwrap();
    BillingService::submit(&mut ledger, Some(&session), draft)
        .map_err(|(_, err)| err)
        .expect("submit bill");
    ledger
}

#[test]
fn ledger_with_bills_survives_a_reload() {
    let (storage, _) = setup_test_env();
    let ledger = submitted_ledger();
    storage.save(&ledger, "Household").unwrap();

    let loaded = storage.load("household").unwrap();
    assert_eq!(loaded.entries.len(), 3);
    assert_eq!(loaded.bills.len(), 1);
    let bill = &loaded.bills[0].bill;
    assert_eq!(bill.grand_total(), 62_500.0);
    assert_eq!(bill.payment_terms()[1].amount(), 31_250.0);
    assert_eq!(bill, &ledger.bills[0].bill);

    let project = loaded.selected_project().unwrap().id;
    assert_eq!(SummaryService::totals(&loaded, project).net_balance, 39_800.0);
}

#[test]
fn hand_edited_bill_totals_are_rederived_on_load() {
    let temp = TempDir::new().unwrap();
    let storage = JsonStorage::new(Some(temp.path().join("home")), None).unwrap();
    let ledger = submitted_ledger();

    let mut json = serde_json::to_value(&ledger).unwrap();
    json["bills"][0]["bill"]["grand_total"] = serde_json::json!(1.0);
    json["bills"][0]["bill"]["payment_terms"][1]["amount"] = serde_json::json!(7.0);
    let edited = temp.child("edited.json");
    edited.write_str(&json.to_string()).unwrap();

    let loaded = storage.load_from_path(edited.path()).unwrap();
    let bill = &loaded.bills[0].bill;
    assert_eq!(bill.grand_total(), 62_500.0);
    assert_eq!(bill.payment_terms()[1].amount(), 31_250.0);

    json["bills"][0]["bill"]["payment_terms"][1]["percentage"] = serde_json::json!(-500.0);
    let broken = temp.child("broken.json");
    broken.write_str(&json.to_string()).unwrap();
    assert!(storage.load_from_path(broken.path()).is_err());
}

#[test]
fn save_writes_canonical_file_and_backs_up_previous_version() {
    let temp = TempDir::new().unwrap();
    let storage = JsonStorage::new(Some(temp.path().to_path_buf()), Some(5)).unwrap();
    let ledger = sample_ledger();

    storage.save(&ledger, "My Site").unwrap();
    temp.child("ledgers/my_site.json")
        .assert(predicate::path::exists())
        .assert(predicate::str::contains("\"Villa\""));
    temp.child("ledgers/my_site.json.tmp")
        .assert(predicate::path::missing());

    storage.save(&ledger, "My Site").unwrap();
    assert_eq!(storage.list_backups("My Site").unwrap().len(), 1);
}

#[test]
fn restore_replaces_the_named_ledger() {
    let (storage, _) = setup_test_env();
    let mut ledger = sample_ledger();
    storage.save(&ledger, "site").unwrap();
    let backup = storage.backup(&ledger, "site", Some("before cleanup")).unwrap();
    assert!(backup.contains("before-cleanup"));

    ledger.entries.clear();
    storage.save(&ledger, "site").unwrap();
    assert!(storage.load("site").unwrap().entries.is_empty());

    let restored = storage.restore("site", &backup).unwrap();
    assert_eq!(restored.entries.len(), 3);
    assert_eq!(storage.load("site").unwrap().entries.len(), 3);
}

#[test]
fn lenient_entries_load_with_defaults() {
    let temp = TempDir::new().unwrap();
    let project = uuid::Uuid::new_v4();
    let json = format!(
        r#"{{
  "id": "{ledger}",
  "name": "Imported",
  "projects": [],
  "entries": [
    {{ "project_id": "{project}", "amount": "abc", "date": "2024-01-02" }},
    {{ "project_id": "{project}", "type": "income", "amount": "250", "date": "2024-01-03" }}
  ],
  "created_at": "2024-01-01T00:00:00Z",
  "updated_at": "2024-01-01T00:00:00Z"
}}"#,
        ledger = uuid::Uuid::new_v4(),
        project = project,
    );
    let file = temp.child("imported.json");
    file.write_str(&json).unwrap();

    let storage = JsonStorage::new(Some(temp.path().join("home")), None).unwrap();
    let ledger = storage.load_from_path(file.path()).unwrap();
    assert_eq!(ledger.entries.len(), 2);
    assert_eq!(ledger.entries[0].kind, EntryKind::Expense);
    assert_eq!(ledger.entries[0].amount, 0.0);
    assert_eq!(ledger.entries[0].category, "");
    assert_eq!(ledger.entries[1].kind, EntryKind::Income);
    assert_eq!(ledger.entries[1].amount, 250.0);
    assert_eq!(tally_core::storage::ledger_warnings(&ledger).len(), 2);
}

#[test]
fn exported_estimate_lands_in_directory() {
    let temp = TempDir::new().unwrap();
    let ledger = submitted_ledger();
    let path = BillingService::export(&ledger, &Config::default(), "b-7", Some(temp.path()))
        .expect("export");
    assert_eq!(path, temp.path().join("interior-bill-B-7.txt"));
    temp.child("interior-bill-B-7.txt")
        .assert(predicate::str::contains("Customer: Lakshmi"))
        .assert(predicate::str::contains("Grand Total: ₹62,500.00"));
}
