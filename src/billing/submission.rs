use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::billing::calculator::{BillCalculator, FinalizedBill};
use crate::billing::draft::BillDraft;
use crate::domain::Session;
use crate::errors::{Result, TallyError};

/// Identity assigned to a bill when a sink accepts it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct BillId(pub Uuid);

impl BillId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BillId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Accepts finalized bills on behalf of a session.
pub trait SubmissionSink {
    fn submit(&mut self, bill: &FinalizedBill, session: &Session) -> Result<BillId>;
}

/// Produces a printable document for a previously submitted bill.
pub trait DocumentSink {
    fn render(&self, id: BillId) -> Result<Vec<u8>>;
}

/// A bill after submission; nothing in it can change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmittedBill {
    pub id: BillId,
    pub author: String,
    pub submitted_at: DateTime<Utc>,
    pub bill: FinalizedBill,
}

impl SubmittedBill {
    pub fn new(id: BillId, author: impl Into<String>, bill: FinalizedBill) -> Self {
        Self {
            id,
            author: author.into(),
            submitted_at: Utc::now(),
            bill,
        }
    }
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct BillReceipt {
    pub id: BillId,
    pub bill: FinalizedBill,
}

/// A submission that did not go through. The draft is handed back unchanged.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct Rejected {
    pub draft: Box<BillDraft>,
    #[source]
    pub error: TallyError,
}

impl Rejected {
    fn new(draft: BillDraft, error: impl Into<TallyError>) -> Self {
        Self {
            draft: Box::new(draft),
            error: error.into(),
        }
    }
}

impl BillDraft {
    /// Validates, finalizes and hands the bill to `sink`.
    ///
    /// Consumes the draft on success; there is no way back from a submitted
    /// bill to an editable one. Sink failures are returned as-is and never
    /// retried.
    pub fn submit(
        self,
        session: Option<&Session>,
        sink: &mut dyn SubmissionSink,
    ) -> std::result::Result<BillReceipt, Rejected> {
        let session = match Session::require(session) {
            Ok(session) => session,
            Err(err) => return Err(Rejected::new(self, err)),
        };
        if let Err(err) = self.validate_for_submission() {
            return Err(Rejected::new(self, err));
        }
        let bill = match BillCalculator::finalize_bill(&self) {
            Ok(bill) => bill,
            Err(err) => return Err(Rejected::new(self, err)),
        };
        match sink.submit(&bill, session) {
            Ok(id) => {
                tracing::info!(
                    bill_id = %id,
                    bill_number = %bill.bill_number(),
                    grand_total = bill.grand_total(),
                    author = %session.user_id,
                    "bill submitted"
                );
                Ok(BillReceipt { id, bill })
            }
            Err(err) => {
                tracing::warn!(bill_number = %bill.bill_number(), error = %err, "submission failed");
                Err(Rejected::new(self, err))
            }
        }
    }
}
