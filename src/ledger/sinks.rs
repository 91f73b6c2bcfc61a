use crate::billing::{
    render_estimate, BillId, DocumentSink, FinalizedBill, SubmissionSink, SubmittedBill,
};
use crate::currency::{CurrencyCode, LocaleConfig};
use crate::domain::Session;
use crate::errors::{Result, TallyError, ValidationError};
use crate::ledger::Ledger;

impl SubmissionSink for Ledger {
    fn submit(&mut self, bill: &FinalizedBill, session: &Session) -> Result<BillId> {
        if self.bill_by_number(bill.bill_number()).is_some() {
            return Err(ValidationError::AlreadySubmitted(bill.bill_number().to_string()).into());
        }
        let id = BillId::new();
        self.bills
            .push(SubmittedBill::new(id, session.user_id.clone(), bill.clone()));
        self.touch();
        Ok(id)
    }
}

/// Renders stored bills as plain-text estimates.
pub struct LedgerDocumentSink<'a> {
    ledger: &'a Ledger,
    locale: LocaleConfig,
    currency: CurrencyCode,
}

impl<'a> LedgerDocumentSink<'a> {
    pub fn new(ledger: &'a Ledger, locale: LocaleConfig, currency: CurrencyCode) -> Self {
        Self {
            ledger,
            locale,
            currency,
        }
    }
}

impl DocumentSink for LedgerDocumentSink<'_> {
    fn render(&self, id: BillId) -> Result<Vec<u8>> {
        let stored = self
            .ledger
            .bill(id)
            .ok_or_else(|| TallyError::NotFound(format!("bill {id}")))?;
        Ok(render_estimate(&stored.bill, &self.locale, &self.currency).into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::{BillDraft, ItemField};
    use chrono::NaiveDate;

    fn ready_draft(number: &str) -> BillDraft {
        let mut draft = BillDraft::with_defaults(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        draft.set_bill_number(number).unwrap();
        draft.set_customer_name("Farah").unwrap();
        draft.set_item_field(0, ItemField::Particular, "Kitchen").unwrap();
        draft
    }

    #[test]
    fn duplicate_bill_numbers_are_rejected() {
        let mut ledger = Ledger::new("Studio");
        let session = Session::new("farah").unwrap();
        ready_draft("B-1").submit(Some(&session), &mut ledger).unwrap();
        let rejected = ready_draft("b-1")
            .submit(Some(&session), &mut ledger)
            .unwrap_err();
        assert!(matches!(
            rejected.error,
            TallyError::Validation(ValidationError::AlreadySubmitted(_))
        ));
        assert_eq!(ledger.bills.len(), 1);
        assert_eq!(ledger.bills[0].author, "farah");
    }

    #[test]
    fn document_sink_renders_stored_bill() {
        let mut ledger = Ledger::new("Studio");
        let session = Session::new("farah").unwrap();
        let receipt = ready_draft("B-2").submit(Some(&session), &mut ledger).unwrap();
        let sink = LedgerDocumentSink::new(&ledger, LocaleConfig::default(), CurrencyCode::default());
        let bytes = sink.render(receipt.id).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("Bill No : B-2"));
        assert!(matches!(
            sink.render(BillId::new()),
            Err(TallyError::NotFound(_))
        ));
        assert_eq!(ledger.find_bill(&receipt.id.to_string()).unwrap().id, receipt.id);
        assert_eq!(ledger.find_bill("B-2").unwrap().id, receipt.id);
    }
}
