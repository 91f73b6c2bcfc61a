pub mod billing_service;
pub mod entry_service;
pub mod project_service;
pub mod summary_service;

pub use billing_service::BillingService;
pub use entry_service::EntryService;
pub use project_service::ProjectService;
pub use summary_service::{
    BalanceTotals, CategoryTotal, IncomeVsExpense, MonthlyBalance, MonthlyExpense,
    OverallSummary, ProjectBalance, SummaryService, YearlyBalance,
};

use crate::errors::{TallyError, ValidationError};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] TallyError),
    #[error("{0}")]
    Invalid(String),
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Core(TallyError::Validation(err))
    }
}

impl ServiceError {
    pub fn is_validation(&self) -> bool {
        match self {
            ServiceError::Core(err) => err.is_validation(),
            ServiceError::Invalid(_) => true,
        }
    }
}

#[cfg(test)]
mod tests;
