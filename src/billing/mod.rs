//! Interior-design billing: line items, payment schedules and the calculator
//! that keeps their derived amounts consistent.

pub mod calculator;
pub mod document;
pub mod draft;
pub mod item;
pub mod payment;
pub mod submission;

pub use calculator::{
    recompute_grand_total, recompute_item_total, recompute_payment_terms, BillCalculator,
    BillHeader, FinalizedBill, PricedItems, TotaledBill,
};
pub use document::{export_file_name, render_estimate};
pub use draft::{default_terms_and_conditions, BillDraft, CompanyDetails};
pub use item::{ItemField, LineItem, Unit};
pub use payment::{default_schedule, PaymentTerm, TOKEN_NOTE};
pub use submission::{BillId, BillReceipt, DocumentSink, Rejected, SubmissionSink, SubmittedBill};
