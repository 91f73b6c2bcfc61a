//! Numeric ingestion helpers.
//!
//! Every monetary or dimensional value crosses one of these functions before it
//! reaches the calculator, so `NaN` and infinities never enter a total.

use crate::errors::ValidationError;

/// Parses a strictly valid, finite, non-negative number.
pub fn parse_non_negative(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    let value = trimmed
        .replace(',', "")
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            value: trimmed.to_string(),
        })?;
    ensure_non_negative(field, value)
}

/// Checks an already-typed value for finiteness and sign.
pub fn ensure_non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidNumber {
            field,
            value: value.to_string(),
        });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field, value });
    }
    Ok(value)
}

/// Parses a percentage and keeps it inside `[0, 100]`.
pub fn parse_percentage(raw: &str) -> Result<f64, ValidationError> {
    let value = parse_non_negative("percentage", raw)?;
    ensure_percentage(value)
}

pub fn ensure_percentage(value: f64) -> Result<f64, ValidationError> {
    let value = ensure_non_negative("percentage", value)?;
    if value > 100.0 {
        return Err(ValidationError::PercentageOutOfRange(value));
    }
    Ok(value)
}

/// Lenient coercion used for loosely-typed form input: anything that is not a
/// finite number becomes `0.0`.
pub fn coerce_amount(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_nan_and_infinity() {
        assert!(matches!(
            parse_non_negative("width", "NaN"),
            Err(ValidationError::InvalidNumber { field: "width", .. })
        ));
        assert!(parse_non_negative("width", "inf").is_err());
    }

    #[test]
    fn parse_accepts_grouped_digits() {
        assert_eq!(parse_non_negative("price", "1,250").unwrap(), 1250.0);
    }

    #[test]
    fn negative_values_are_rejected() {
        let err = parse_non_negative("price", "-5").expect_err("negative price");
        assert_eq!(
            err,
            ValidationError::NegativeValue {
                field: "price",
                value: -5.0
            }
        );
    }

    #[test]
    fn percentage_is_bounded() {
        assert_eq!(parse_percentage("50").unwrap(), 50.0);
        assert_eq!(
            parse_percentage("120"),
            Err(ValidationError::PercentageOutOfRange(120.0))
        );
    }

    #[test]
    fn coerce_falls_back_to_zero() {
        assert_eq!(coerce_amount("abc"), 0.0);
        assert_eq!(coerce_amount(" 42.5 "), 42.5);
        assert_eq!(coerce_amount("NaN"), 0.0);
    }
}
