use serde::{Deserialize, Serialize};

use crate::domain::numeric::{ensure_non_negative, ensure_percentage};
use crate::errors::ValidationError;

/// Marker identifying a fixed-amount term.
pub const TOKEN_NOTE: &str = "Token";

/// A milestone in the payment schedule.
///
/// Token terms carry an authored amount. Every other term derives its amount
/// from the grand total and is rewritten by
/// [`recompute_payment_terms`](crate::billing::calculator::recompute_payment_terms).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "StoredTerm")]
pub struct PaymentTerm {
    pub stage: String,
    percentage: f64,
    amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl PaymentTerm {
    /// Percentage-based term. Its amount stays `0` until recomputed.
    pub fn percent(stage: impl Into<String>, percentage: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            stage: stage.into(),
            percentage: ensure_percentage(percentage)?,
            amount: 0.0,
            note: None,
        })
    }

    /// Fixed-amount term that is independent of the grand total.
    pub fn token(stage: impl Into<String>, amount: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            stage: stage.into(),
            percentage: 0.0,
            amount: ensure_non_negative("amount", amount)?,
            note: Some(TOKEN_NOTE.to_string()),
        })
    }

    pub fn is_token(&self) -> bool {
        self.note.as_deref() == Some(TOKEN_NOTE)
    }

    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn set_percentage(&mut self, percentage: f64) -> Result<(), ValidationError> {
        self.percentage = ensure_percentage(percentage)?;
        Ok(())
    }

    /// Updates the authored amount of a token term.
    pub fn set_token_amount(&mut self, amount: f64) -> Result<(), ValidationError> {
        if !self.is_token() {
            return Err(ValidationError::Other(format!(
                "`{}` is not a token term",
                self.stage
            )));
        }
        self.amount = ensure_non_negative("amount", amount)?;
        Ok(())
    }

    /// Returns a copy with the amount derived from `grand_total`. Token terms
    /// come back unchanged.
    pub(crate) fn priced_against(&self, grand_total: f64) -> Self {
        if self.is_token() {
            return self.clone();
        }
        Self {
            amount: grand_total * self.percentage / 100.0,
            ..self.clone()
        }
    }
}

/// Persisted shape. Non-token amounts are dropped and re-derived by whoever
/// prices the term.
#[derive(Deserialize)]
struct StoredTerm {
    stage: String,
    #[serde(default)]
    percentage: f64,
    #[serde(default)]
    amount: f64,
    #[serde(default)]
    note: Option<String>,
}

impl TryFrom<StoredTerm> for PaymentTerm {
    type Error = ValidationError;

    fn try_from(stored: StoredTerm) -> Result<Self, Self::Error> {
        if stored.note.as_deref() == Some(TOKEN_NOTE) {
            return Self::token(stored.stage, stored.amount);
        }
        let mut term = Self::percent(stored.stage, stored.percentage)?;
        term.note = stored.note;
        Ok(term)
    }
}

/// The five-stage schedule every new draft starts with.
pub fn default_schedule() -> Vec<PaymentTerm> {
    vec![
        PaymentTerm {
            stage: "Confirmation advance with work order".into(),
            percentage: 0.0,
            amount: 50_000.0,
            note: Some(TOKEN_NOTE.into()),
        },
        stage("Material advance", 50.0),
        stage("After completion of box work", 20.0),
        stage("At the time of finishes like polishing and painting", 20.0),
        stage("On total handover with completion of check list", 10.0),
    ]
}

fn stage(label: &str, percentage: f64) -> PaymentTerm {
    PaymentTerm {
        stage: label.into(),
        percentage,
        amount: 0.0,
        note: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_has_one_token() {
        let terms = default_schedule();
        assert_eq!(terms.len(), 5);
        assert!(terms[0].is_token());
        assert_eq!(terms[0].amount(), 50_000.0);
        let pct: f64 = terms.iter().map(PaymentTerm::percentage).sum();
        assert_eq!(pct, 100.0);
    }

    #[test]
    fn token_amount_only_on_token_terms() {
        let mut plain = PaymentTerm::percent("Material advance", 50.0).unwrap();
        assert!(plain.set_token_amount(10.0).is_err());
        let mut token = PaymentTerm::token("Advance", 1000.0).unwrap();
        token.set_token_amount(2500.0).unwrap();
        assert_eq!(token.amount(), 2500.0);
        assert!(token.set_token_amount(-1.0).is_err());
        assert_eq!(token.amount(), 2500.0);
    }

    #[test]
    fn percentage_outside_range_is_rejected() {
        assert_eq!(
            PaymentTerm::percent("x", 150.0),
            Err(ValidationError::PercentageOutOfRange(150.0))
        );
    }

    #[test]
    fn stored_terms_are_validated_on_load() {
        let plain: PaymentTerm =
            serde_json::from_str(r#"{"stage":"Box work","percentage":20,"amount":999}"#).unwrap();
        assert_eq!(plain.percentage(), 20.0);
        assert_eq!(plain.amount(), 0.0);

        let token: PaymentTerm =
            serde_json::from_str(r#"{"stage":"Advance","amount":5000,"note":"Token"}"#).unwrap();
        assert!(token.is_token());
        assert_eq!(token.amount(), 5000.0);

        assert!(serde_json::from_str::<PaymentTerm>(r#"{"stage":"x","percentage":-500}"#).is_err());
        assert!(serde_json::from_str::<PaymentTerm>(r#"{"stage":"x","percentage":250}"#).is_err());
        assert!(serde_json::from_str::<PaymentTerm>(
            r#"{"stage":"x","amount":-1,"note":"Token"}"#
        )
        .is_err());
    }
}
