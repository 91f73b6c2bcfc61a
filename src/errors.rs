use thiserror::Error;

/// Field-level rejections raised before any computation runs.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("{field}: `{value}` is not a valid number")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{field} must not be negative (got {value})")]
    NegativeValue { field: &'static str, value: f64 },
    #[error("percentage must be between 0 and 100 (got {0})")]
    PercentageOutOfRange(f64),
    #[error("unknown unit `{0}` (expected Sft or Lump)")]
    UnknownUnit(String),
    #[error("unknown entry type `{0}` (expected Income or Expense)")]
    UnknownEntryType(String),
    #[error("no active session; log in first")]
    MissingSession,
    #[error("no project selected")]
    MissingProject,
    #[error("{kind} index {index} is out of range")]
    IndexOutOfRange { kind: &'static str, index: usize },
    #[error("bill `{0}` has already been submitted")]
    AlreadySubmitted(String),
    #[error("{0}")]
    Other(String),
}

/// Unified error type for the domain, billing, and storage layers.
#[derive(Debug, Error)]
pub enum TallyError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("Computation error: {0}")]
    Computation(String),
    #[error("External collaborator failed: {0}")]
    External(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, TallyError>;

impl From<std::io::Error> for TallyError {
    fn from(err: std::io::Error) -> Self {
        TallyError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for TallyError {
    fn from(err: serde_json::Error) -> Self {
        TallyError::Storage(err.to_string())
    }
}

impl TallyError {
    pub fn is_validation(&self) -> bool {
        matches!(self, TallyError::Validation(_))
    }
}
