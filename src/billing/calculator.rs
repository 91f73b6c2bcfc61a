//! Bill arithmetic.
//!
//! The free functions are the pure building blocks. [`BillCalculator`] chains
//! them through three stage types so that a grand total can only be read
//! after every item was priced, and term amounts only after the grand total
//! exists.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::billing::draft::{BillDraft, CompanyDetails};
use crate::billing::item::{LineItem, Unit};
use crate::billing::payment::PaymentTerm;
use crate::errors::{Result, TallyError};

pub fn recompute_item_total(item: &LineItem) -> f64 {
    match item.unit() {
        Unit::Sft => item.width() * item.height() * item.price_per_unit(),
        Unit::Lump => item.price_per_unit(),
    }
}

/// Sums item totals in sequence order.
pub fn recompute_grand_total(items: &[LineItem]) -> f64 {
    items.iter().map(LineItem::total).sum()
}

pub fn recompute_payment_terms(terms: &[PaymentTerm], grand_total: f64) -> Vec<PaymentTerm> {
    terms
        .iter()
        .map(|term| term.priced_against(grand_total))
        .collect()
}

/// Identity and boilerplate carried unchanged through every stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillHeader {
    pub bill_number: String,
    pub bill_date: NaiveDate,
    pub customer_name: String,
    pub company: CompanyDetails,
    pub terms_and_conditions: Vec<String>,
}

/// Stage one: every item total has been re-derived.
#[derive(Debug, Clone)]
pub struct PricedItems {
    header: BillHeader,
    items: Vec<LineItem>,
    terms: Vec<PaymentTerm>,
}

/// Stage two: the grand total is known.
#[derive(Debug, Clone)]
pub struct TotaledBill {
    header: BillHeader,
    items: Vec<LineItem>,
    terms: Vec<PaymentTerm>,
    grand_total: f64,
}

/// A fully consistent bill ready for submission or rendering.
///
/// Loading never trusts stored totals: the bill is re-finalized from its
/// items and terms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "StoredBill")]
pub struct FinalizedBill {
    #[serde(flatten)]
    header: BillHeader,
    items: Vec<LineItem>,
    payment_terms: Vec<PaymentTerm>,
    grand_total: f64,
}

impl PricedItems {
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn total(self) -> Result<TotaledBill> {
        let grand_total = recompute_grand_total(&self.items);
        guard("grand total", grand_total)?;
        Ok(TotaledBill {
            header: self.header,
            items: self.items,
            terms: self.terms,
            grand_total,
        })
    }
}

impl TotaledBill {
    pub fn grand_total(&self) -> f64 {
        self.grand_total
    }

    pub fn schedule(self) -> Result<FinalizedBill> {
        let payment_terms = recompute_payment_terms(&self.terms, self.grand_total);
        for term in &payment_terms {
            guard("payment term amount", term.amount())?;
        }
        Ok(FinalizedBill {
            header: self.header,
            items: self.items,
            payment_terms,
            grand_total: self.grand_total,
        })
    }
}

impl FinalizedBill {
    pub fn header(&self) -> &BillHeader {
        &self.header
    }

    pub fn bill_number(&self) -> &str {
        &self.header.bill_number
    }

    pub fn customer_name(&self) -> &str {
        &self.header.customer_name
    }

    pub fn bill_date(&self) -> NaiveDate {
        self.header.bill_date
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn payment_terms(&self) -> &[PaymentTerm] {
        &self.payment_terms
    }

    pub fn grand_total(&self) -> f64 {
        self.grand_total
    }

    /// Sum of the percentages of non-token terms. Not required to be 100.
    pub fn percentage_total(&self) -> f64 {
        self.payment_terms
            .iter()
            .filter(|term| !term.is_token())
            .map(PaymentTerm::percentage)
            .sum()
    }

    pub fn scheduled_total(&self) -> f64 {
        self.payment_terms.iter().map(PaymentTerm::amount).sum()
    }

    /// Reopens the bill as an editable draft with identical inputs.
    pub fn to_draft(&self) -> BillDraft {
        BillDraft::from_parts(
            self.header.bill_number.clone(),
            self.header.bill_date,
            self.header.customer_name.clone(),
            self.header.company.clone(),
            self.items.clone(),
            self.payment_terms.clone(),
            self.header.terms_and_conditions.clone(),
        )
    }
}

#[derive(Deserialize)]
struct StoredBill {
    #[serde(flatten)]
    header: BillHeader,
    items: Vec<LineItem>,
    payment_terms: Vec<PaymentTerm>,
}

impl TryFrom<StoredBill> for FinalizedBill {
    type Error = TallyError;

    fn try_from(stored: StoredBill) -> Result<Self> {
        let header = stored.header;
        let draft = BillDraft::from_parts(
            header.bill_number,
            header.bill_date,
            header.customer_name,
            header.company,
            stored.items,
            stored.payment_terms,
            header.terms_and_conditions,
        );
        BillCalculator::finalize_bill(&draft)
    }
}

/// Entry point for turning drafts into finalized bills.
pub struct BillCalculator;

impl BillCalculator {
    pub fn price_items(draft: &BillDraft) -> Result<PricedItems> {
        let mut items = draft.items().to_vec();
        for item in &mut items {
            item.refresh_total();
            guard("item total", item.total())?;
        }
        Ok(PricedItems {
            header: BillHeader {
                bill_number: draft.bill_number.clone(),
                bill_date: draft.bill_date,
                customer_name: draft.customer_name.clone(),
                company: draft.company.clone(),
                terms_and_conditions: draft.terms_and_conditions.clone(),
            },
            items,
            terms: draft.payment_terms().to_vec(),
        })
    }

    /// Items, then grand total, then payment terms.
    pub fn finalize_bill(draft: &BillDraft) -> Result<FinalizedBill> {
        let bill = Self::price_items(draft)?.total()?.schedule()?;
        tracing::debug!(
            bill_number = %bill.bill_number(),
            grand_total = bill.grand_total(),
            "bill finalized"
        );
        Ok(bill)
    }
}

fn guard(what: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TallyError::Computation(format!("{what} is not finite")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::item::ItemField;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn draft_with(items: Vec<LineItem>, terms: Vec<PaymentTerm>) -> BillDraft {
        BillDraft::from_parts(
            "B-7".into(),
            date(),
            "Meena".into(),
            CompanyDetails::default(),
            items,
            terms,
            Vec::new(),
        )
    }

    #[test]
    fn sft_item_multiplies_area_by_rate() {
        let item = LineItem::new("Table", "d", Unit::Sft, 1250.0).with_dimensions(10.0, 5.0);
        assert_eq!(recompute_item_total(&item), 62_500.0);
        assert_eq!(item.computed_area(), Some(50.0));
    }

    #[test]
    fn lump_item_ignores_dimensions() {
        let item = LineItem::new("Sofa", "d", Unit::Lump, 50_000.0).with_dimensions(3.0, 4.0);
        assert_eq!(recompute_item_total(&item), 50_000.0);
    }

    #[test]
    fn empty_bill_finalizes_to_zero() {
        let bill = BillCalculator::finalize_bill(&draft_with(
            Vec::new(),
            vec![PaymentTerm::percent("Only", 100.0).unwrap()],
        ))
        .unwrap();
        assert_eq!(bill.grand_total(), 0.0);
        assert_eq!(bill.payment_terms()[0].amount(), 0.0);
    }

    #[test]
    fn overflowing_total_is_a_computation_error() {
        let item = LineItem::default().with_dimensions(1e200, 1e200);
        let draft = draft_with(vec![item], Vec::new());
        let err = BillCalculator::finalize_bill(&draft).unwrap_err();
        assert!(matches!(err, TallyError::Computation(_)));
    }

    #[test]
    fn percentage_total_excludes_tokens() {
        let draft = BillDraft::with_defaults(date());
        let bill = BillCalculator::finalize_bill(&draft).unwrap();
        assert_eq!(bill.percentage_total(), 100.0);
    }

    #[test]
    fn stages_expose_intermediate_values() {
        let draft = draft_with(
            vec![LineItem::new("Shelf", "d", Unit::Lump, 900.0)],
            Vec::new(),
        );
        let priced = BillCalculator::price_items(&draft).unwrap();
        assert_eq!(priced.items()[0].total(), 900.0);
        let totaled = priced.total().unwrap();
        assert_eq!(totaled.grand_total(), 900.0);
    }

    #[test]
    fn stored_totals_are_rederived_on_load() {
        let mut draft = BillDraft::with_defaults(date());
        draft.set_item_field(0, ItemField::Width, "10").unwrap();
        draft.set_item_field(0, ItemField::Height, "5").unwrap();
        let bill = BillCalculator::finalize_bill(&draft).unwrap();

        let mut json = serde_json::to_value(&bill).unwrap();
        json["grand_total"] = serde_json::json!(1.0);
        json["items"][0]["total"] = serde_json::json!(3.0);
        json["payment_terms"][1]["amount"] = serde_json::json!(7.0);
        let loaded: FinalizedBill = serde_json::from_value(json).unwrap();
        assert_eq!(loaded.grand_total(), 62_500.0);
        assert_eq!(loaded.items()[0].total(), 62_500.0);
        assert_eq!(loaded.payment_terms()[1].amount(), 31_250.0);
        assert_eq!(loaded, bill);
    }

    #[test]
    fn stored_bill_with_bad_percentage_fails_to_load() {
        let bill = BillCalculator::finalize_bill(&BillDraft::with_defaults(date())).unwrap();
        let mut json = serde_json::to_value(&bill).unwrap();
        json["payment_terms"][1]["percentage"] = serde_json::json!(-500.0);
        assert!(serde_json::from_value::<FinalizedBill>(json).is_err());
    }
}
