//! Bill submission and export against a ledger.

use std::path::{Path, PathBuf};

use crate::billing::{
    export_file_name, BillDraft, BillReceipt, DocumentSink, SubmittedBill,
};
use crate::config::Config;
use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::Session;
use crate::errors::TallyError;
use crate::ledger::{Ledger, LedgerDocumentSink};
use crate::utils::fs::write_bytes;

pub struct BillingService;

impl BillingService {
    /// Submits `draft` into the ledger. On failure the draft is returned
    /// alongside the error so editing can continue.
    pub fn submit(
        ledger: &mut Ledger,
        session: Option<&Session>,
        draft: BillDraft,
    ) -> Result<BillReceipt, (BillDraft, ServiceError)> {
        draft
            .submit(session, ledger)
            .map_err(|rejected| (*rejected.draft, ServiceError::Core(rejected.error)))
    }

    pub fn list(ledger: &Ledger) -> Vec<&SubmittedBill> {
        let mut bills: Vec<&SubmittedBill> = ledger.bills.iter().collect();
        bills.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        bills
    }

    pub fn find<'a>(ledger: &'a Ledger, key: &str) -> ServiceResult<&'a SubmittedBill> {
        ledger
            .find_bill(key)
            .ok_or_else(|| TallyError::NotFound(format!("bill `{}`", key.trim())).into())
    }

    /// Renders a stored bill and writes it under `target`. A directory target
    /// receives the default file name.
    pub fn export(
        ledger: &Ledger,
        config: &Config,
        key: &str,
        target: Option<&Path>,
    ) -> ServiceResult<PathBuf> {
        let stored = Self::find(ledger, key)?;
        let sink = LedgerDocumentSink::new(ledger, config.locale_config(), config.currency_code());
        let bytes = sink.render(stored.id)?;
        let file_name = export_file_name(stored.bill.bill_number());
        let path = match target {
            Some(path) if path.is_dir() => path.join(file_name),
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(file_name),
        };
        write_bytes(&path, &bytes)?;
        tracing::info!(bill_id = %stored.id, path = %path.display(), "estimate exported");
        Ok(path)
    }
}
