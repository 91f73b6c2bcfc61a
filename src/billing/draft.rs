use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::billing::calculator::{recompute_grand_total, recompute_payment_terms};
use crate::billing::item::{ItemField, LineItem};
use crate::billing::payment::{default_schedule, PaymentTerm};
use crate::domain::common::require_text;
use crate::domain::numeric::{parse_non_negative, parse_percentage};
use crate::errors::ValidationError;

/// Letterhead printed at the top of every estimate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompanyDetails {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub phones: Vec<String>,
}

impl Default for CompanyDetails {
    fn default() -> Self {
        Self {
            name: "JK INTERIOR'S".into(),
            address: "502, Spellbound towers,Sainikpuri,Secunderabad,Telangana 501301".into(),
            phones: vec!["9063096060".into(), "8099961514".into()],
        }
    }
}

pub fn default_terms_and_conditions() -> Vec<String> {
    [
        "It will take 2 days to start the work in site after getting the basic advance, because we need to finalise the concept and drawings as per the concept selected",
        "Taxes as applicable if required",
        "Water and power should be arranged by the client",
        "This is estimated quotation just to understand the budget, final billing will be done as per actuals on site",
        "Price's coated are valid up to 30 days only",
        "All visible internal surfaces are finished in .8 mm white or half white laminate",
        "All External surfaces are finished with 1mm thick laminate of sf or glossy grade of reputed make",
        "Scope of Work: The scope of work outlined in this quotation includes the services and deliverables as discussed and agreed upon between the client and the designer.",
        "Payment: A non-refundable deposit is required before work commences. The remaining balance will be invoiced at various stages of the project.",
        "Changes and Revisions: Any changes or revisions to the project scope may incur additional charges.",
    ]
    .iter()
    .map(|clause| clause.to_string())
    .collect()
}

/// A bill under construction.
///
/// Every successful mutation leaves item totals and non-token term amounts
/// consistent with the current inputs. A mutation that fails validation
/// leaves the draft exactly as it was.
#[derive(Debug, Clone, PartialEq)]
pub struct BillDraft {
    pub bill_number: String,
    pub bill_date: NaiveDate,
    pub customer_name: String,
    pub company: CompanyDetails,
    items: Vec<LineItem>,
    payment_terms: Vec<PaymentTerm>,
    pub terms_and_conditions: Vec<String>,
}

impl BillDraft {
    /// Starts a draft with one template item and the default schedule.
    pub fn new(company: CompanyDetails, clauses: Vec<String>, bill_date: NaiveDate) -> Self {
        let mut draft = Self {
            bill_number: String::new(),
            bill_date,
            customer_name: String::new(),
            company,
            items: vec![LineItem::default()],
            payment_terms: default_schedule(),
            terms_and_conditions: clauses,
        };
        draft.reprice_terms();
        draft
    }

    pub fn with_defaults(bill_date: NaiveDate) -> Self {
        Self::new(
            CompanyDetails::default(),
            default_terms_and_conditions(),
            bill_date,
        )
    }

    pub fn from_parts(
        bill_number: String,
        bill_date: NaiveDate,
        customer_name: String,
        company: CompanyDetails,
        items: Vec<LineItem>,
        payment_terms: Vec<PaymentTerm>,
        terms_and_conditions: Vec<String>,
    ) -> Self {
        let mut draft = Self {
            bill_number,
            bill_date,
            customer_name,
            company,
            items,
            payment_terms,
            terms_and_conditions,
        };
        draft.reprice_terms();
        draft
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn payment_terms(&self) -> &[PaymentTerm] {
        &self.payment_terms
    }

    pub fn grand_total(&self) -> f64 {
        recompute_grand_total(&self.items)
    }

    pub fn set_bill_number(&mut self, value: &str) -> Result<(), ValidationError> {
        self.bill_number = require_text("bill_number", value)?;
        Ok(())
    }

    pub fn set_customer_name(&mut self, value: &str) -> Result<(), ValidationError> {
        self.customer_name = require_text("customer_name", value)?;
        Ok(())
    }

    pub fn set_bill_date(&mut self, date: NaiveDate) {
        self.bill_date = date;
    }

    pub fn set_item_field(
        &mut self,
        index: usize,
        field: ItemField,
        raw: &str,
    ) -> Result<(), ValidationError> {
        let mut item = self
            .items
            .get(index)
            .ok_or(ValidationError::IndexOutOfRange { kind: "item", index })?
            .clone();
        item.set_field(field, raw)?;
        if field.affects_total() {
            let others: f64 = self
                .items
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != index)
                .map(|(_, other)| other.total())
                .sum();
            if !(others + item.total()).is_finite() {
                return Err(ValidationError::InvalidNumber {
                    field: "grand_total",
                    value: raw.trim().to_string(),
                });
            }
        }
        self.items[index] = item;
        if field.affects_total() {
            self.reprice_terms();
        }
        Ok(())
    }

    /// Appends a template item and returns its index.
    pub fn add_item(&mut self) -> usize {
        self.push_item(LineItem::default())
    }

    pub fn push_item(&mut self, item: LineItem) -> usize {
        self.items.push(item);
        self.reprice_terms();
        self.items.len() - 1
    }

    pub fn remove_item(&mut self, index: usize) -> Result<LineItem, ValidationError> {
        if index >= self.items.len() {
            return Err(ValidationError::IndexOutOfRange { kind: "item", index });
        }
        let removed = self.items.remove(index);
        self.reprice_terms();
        Ok(removed)
    }

    pub fn set_term_percentage(&mut self, index: usize, raw: &str) -> Result<(), ValidationError> {
        let percentage = parse_percentage(raw)?;
        self.term_mut(index)?.set_percentage(percentage)?;
        self.reprice_terms();
        Ok(())
    }

    pub fn set_term_stage(&mut self, index: usize, value: &str) -> Result<(), ValidationError> {
        let stage = require_text("stage", value)?;
        self.term_mut(index)?.stage = stage;
        Ok(())
    }

    pub fn set_token_amount(&mut self, index: usize, raw: &str) -> Result<(), ValidationError> {
        let amount = parse_non_negative("amount", raw)?;
        self.term_mut(index)?.set_token_amount(amount)
    }

    pub fn push_term(&mut self, term: PaymentTerm) -> usize {
        self.payment_terms.push(term);
        self.reprice_terms();
        self.payment_terms.len() - 1
    }

    pub fn remove_term(&mut self, index: usize) -> Result<PaymentTerm, ValidationError> {
        if index >= self.payment_terms.len() {
            return Err(ValidationError::IndexOutOfRange { kind: "term", index });
        }
        Ok(self.payment_terms.remove(index))
    }

    pub fn add_clause(&mut self, text: &str) -> Result<usize, ValidationError> {
        let clause = require_text("clause", text)?;
        self.terms_and_conditions.push(clause);
        Ok(self.terms_and_conditions.len() - 1)
    }

    pub fn set_clause(&mut self, index: usize, text: &str) -> Result<(), ValidationError> {
        let clause = require_text("clause", text)?;
        let slot = self
            .terms_and_conditions
            .get_mut(index)
            .ok_or(ValidationError::IndexOutOfRange { kind: "clause", index })?;
        *slot = clause;
        Ok(())
    }

    pub fn remove_clause(&mut self, index: usize) -> Result<String, ValidationError> {
        if index >= self.terms_and_conditions.len() {
            return Err(ValidationError::IndexOutOfRange { kind: "clause", index });
        }
        Ok(self.terms_and_conditions.remove(index))
    }

    /// Checks the fields a submitted bill must carry.
    pub fn validate_for_submission(&self) -> Result<(), ValidationError> {
        require_text("bill_number", &self.bill_number)?;
        require_text("customer_name", &self.customer_name)?;
        for item in &self.items {
            require_text("particular", &item.particular)?;
            require_text("description", &item.description)?;
        }
        for term in &self.payment_terms {
            require_text("stage", &term.stage)?;
        }
        Ok(())
    }

    fn term_mut(&mut self, index: usize) -> Result<&mut PaymentTerm, ValidationError> {
        self.payment_terms
            .get_mut(index)
            .ok_or(ValidationError::IndexOutOfRange { kind: "term", index })
    }

    fn reprice_terms(&mut self) {
        let grand_total = self.grand_total();
        self.payment_terms = recompute_payment_terms(&self.payment_terms, grand_total);
    }
}
