use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use tally_core::billing::{BillCalculator, BillDraft, LineItem, Unit};
use tally_core::core::services::SummaryService;
use tally_core::domain::{Entry, EntryKind, Project};
use tally_core::ledger::Ledger;
use tally_core::storage::json_backend::{load_ledger_from_path, save_ledger_to_path};
use tempfile::tempdir;

fn build_sample_draft(item_count: usize) -> BillDraft {
    let mut draft = BillDraft::with_defaults(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    draft.remove_item(0).expect("template item");
    for idx in 0..item_count {
        let item = if idx % 4 == 0 {
            LineItem::new("Kitchen", "work", Unit::Lump, 40_000.0 + idx as f64)
        } else {
            LineItem::new("Panel", "work", Unit::Sft, 1250.0)
                .with_dimensions(2.0 + (idx % 10) as f64, 3.0 + (idx % 7) as f64)
        };
        draft.push_item(item);
    }
    draft
}

fn build_sample_ledger(entry_count: usize) -> Ledger {
    let mut ledger = Ledger::new("Benchmark");
    let project = Project::new("Villa", "bench");
    let project_id = project.id;
    ledger.projects.push(project);
    ledger.selected_project = Some(project_id);

    let start_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    for idx in 0..entry_count {
        let kind = if idx % 5 == 0 {
            EntryKind::Income
        } else {
            EntryKind::Expense
        };
        let date = start_date + Duration::days((idx % 365) as i64);
        ledger.entries.push(
            Entry::new(project_id, "bench", kind, 50.0 + (idx % 100) as f64, date)
                .with_category(if idx % 2 == 0 { "food" } else { "rent" }),
        );
    }
    ledger
}

fn bench_finalize(c: &mut Criterion) {
    let draft = build_sample_draft(black_box(500));

    c.bench_function("finalize_bill_500_items", |b| {
        b.iter(|| {
            let bill = BillCalculator::finalize_bill(&draft).expect("finalize");
            black_box(bill);
        })
    });

    c.bench_function("refinalize_from_bill", |b| {
        let bill = BillCalculator::finalize_bill(&draft).expect("finalize");
        b.iter_batched(
            || bill.to_draft(),
            |draft| black_box(BillCalculator::finalize_bill(&draft).expect("finalize")),
            BatchSize::SmallInput,
        )
    });
}

fn bench_ledger(c: &mut Criterion) {
    let ledger = build_sample_ledger(black_box(10_000));
    let project_id = ledger.selected_project.expect("selected project");
    let dir = tempdir().expect("tempdir");
    let file_path = dir.path().join("ledger.json");

    c.bench_function("ledger_save_10k", |b| {
        b.iter(|| save_ledger_to_path(&ledger, &file_path).expect("save ledger"))
    });

    save_ledger_to_path(&ledger, &file_path).expect("seed");

    c.bench_function("ledger_load_10k", |b| {
        b.iter(|| black_box(load_ledger_from_path(&file_path).expect("load ledger")))
    });

    c.bench_function("monthly_summary_10k", |b| {
        b.iter(|| black_box(SummaryService::monthly(&ledger, project_id, 2025)))
    });
}

criterion_group!(benches, bench_finalize, bench_ledger);
criterion_main!(benches);
