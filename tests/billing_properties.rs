use chrono::NaiveDate;
use proptest::prelude::*;
use tally_core::billing::{
    default_schedule, recompute_grand_total, recompute_item_total, recompute_payment_terms,
    BillCalculator, BillDraft, ItemField, LineItem, PaymentTerm, Unit,
};

fn bill_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn draft_with(items: Vec<LineItem>) -> BillDraft {
    let mut draft = BillDraft::with_defaults(bill_date());
    draft.remove_item(0).unwrap();
    for item in items {
        draft.push_item(item);
    }
    draft
}

fn lump(particular: &str, price: f64) -> LineItem {
    LineItem::new(particular, "work", Unit::Lump, price)
}

#[test]
fn sft_item_scenario() {
    let item = LineItem::new("Wardrobe", "work", Unit::Sft, 1250.0).with_dimensions(10.0, 5.0);
    assert_eq!(item.total(), 62_500.0);
    assert_eq!(recompute_item_total(&item), 62_500.0);

    let bill = BillCalculator::finalize_bill(&draft_with(vec![item])).unwrap();
    assert_eq!(bill.grand_total(), 62_500.0);
}

#[test]
fn lump_item_ignores_dimensions() {
    let item = lump("Kitchen", 50_000.0).with_dimensions(12.0, 9.0);
    assert_eq!(item.total(), 50_000.0);
    assert_eq!(item.computed_area(), None);
}

#[test]
fn token_amount_survives_grand_total_change() {
    let terms = vec![
        PaymentTerm::percent("Material advance", 50.0).unwrap(),
        PaymentTerm::token("Advance", 50_000.0).unwrap(),
    ];
    let first = recompute_payment_terms(&terms, 100_000.0);
    assert_eq!(first[0].amount(), 50_000.0);
    assert_eq!(first[1].amount(), 50_000.0);

    let second = recompute_payment_terms(&first, 200_000.0);
    assert_eq!(second[0].amount(), 100_000.0);
    assert_eq!(second[1].amount(), 50_000.0);
}

#[test]
fn default_schedule_against_three_lakh() {
    let mut draft = BillDraft::with_defaults(bill_date());
    draft.set_item_field(0, ItemField::Unit, "Lump").unwrap();
    draft.set_item_field(0, ItemField::PricePerUnit, "300000").unwrap();

    let bill = BillCalculator::finalize_bill(&draft).unwrap();
    assert_eq!(bill.grand_total(), 300_000.0);
    let amounts: Vec<f64> = bill.payment_terms().iter().map(PaymentTerm::amount).collect();
    assert_eq!(amounts, vec![50_000.0, 150_000.0, 60_000.0, 60_000.0, 30_000.0]);
    assert!(bill.payment_terms()[0].is_token());
    assert_eq!(bill.percentage_total(), 100.0);
}

#[test]
fn empty_bill_has_zero_totals() {
    let bill = BillCalculator::finalize_bill(&draft_with(Vec::new())).unwrap();
    assert_eq!(bill.grand_total(), 0.0);
    for term in bill.payment_terms().iter().filter(|term| !term.is_token()) {
        assert_eq!(term.amount(), 0.0);
    }
    assert_eq!(recompute_grand_total(&[]), 0.0);
}

#[test]
fn unknown_unit_is_rejected_and_item_kept() {
    let mut draft = BillDraft::with_defaults(bill_date());
    draft.set_item_field(0, ItemField::Width, "4").unwrap();
    let before = draft.clone();
    assert!(draft.set_item_field(0, ItemField::Unit, "Meter").is_err());
    assert_eq!(draft, before);
}

proptest! {
    #[test]
    fn sft_total_is_area_times_price(
        width in 0u32..1_000,
        height in 0u32..1_000,
        price in 0u32..100_000,
    ) {
        let (w, h, p) = (f64::from(width), f64::from(height), f64::from(price));
        let item = LineItem::new("Item", "work", Unit::Sft, p).with_dimensions(w, h);
        prop_assert_eq!(item.total(), w * h * p);
    }

    #[test]
    fn lump_total_is_price(
        width in 0.0f64..10_000.0,
        height in 0.0f64..10_000.0,
        price in 0u32..1_000_000,
    ) {
        let item = lump("Item", f64::from(price)).with_dimensions(width, height);
        prop_assert_eq!(item.total(), f64::from(price));
    }

    #[test]
    fn grand_total_ignores_item_order(
        prices in prop::collection::vec(0u32..1_000_000, 0..12).prop_shuffle(),
    ) {
        let items: Vec<LineItem> = prices.iter().map(|p| lump("Item", f64::from(*p))).collect();
        let mut reversed = items.clone();
        reversed.reverse();
        let expected: f64 = prices.iter().map(|p| f64::from(*p)).sum();
        prop_assert_eq!(recompute_grand_total(&items), expected);
        prop_assert_eq!(recompute_grand_total(&reversed), expected);
    }

    #[test]
    fn percent_terms_follow_grand_total_and_tokens_do_not(
        grand_total in 0u32..10_000_000,
        token in 0u32..1_000_000,
    ) {
        let gt = f64::from(grand_total);
        let mut terms = default_schedule();
        terms.push(PaymentTerm::token("Extra token", f64::from(token)).unwrap());
        let priced = recompute_payment_terms(&terms, gt);
        prop_assert_eq!(priced.len(), terms.len());
        for (before, after) in terms.iter().zip(&priced) {
            prop_assert_eq!(&before.stage, &after.stage);
            if before.is_token() {
                prop_assert_eq!(after.amount(), before.amount());
            } else {
                prop_assert_eq!(after.amount(), gt * before.percentage() / 100.0);
            }
        }
    }

    #[test]
    fn finalize_is_idempotent(
        prices in prop::collection::vec(0u32..100_000, 0..6),
        width in 0u32..100,
        height in 0u32..100,
    ) {
        let mut items: Vec<LineItem> = prices.iter().map(|p| lump("Item", f64::from(*p))).collect();
        items.push(
            LineItem::new("Panel", "work", Unit::Sft, 1250.0)
                .with_dimensions(f64::from(width), f64::from(height)),
        );
        let draft = draft_with(items);
        let first = BillCalculator::finalize_bill(&draft).unwrap();
        let second = BillCalculator::finalize_bill(&draft).unwrap();
        prop_assert_eq!(&first, &second);
        let again = BillCalculator::finalize_bill(&first.to_draft()).unwrap();
        prop_assert_eq!(&first, &again);
    }
}
