//! Input validation for product fields.
//!
//! These are pure functions: the service calls them before touching the
//! cache, and front ends may call them early to give feedback per field.

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a Name.")]
    MissingName,
    #[error("Please enter a valid number")]
    InvalidNumber,
    #[error("Price cannot be negative.")]
    NegativePrice,
}

/// Rejects a missing or blank name and returns it trimmed.
pub fn validate_name(name: Option<&str>) -> Result<String, ValidationError> {
    match name.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        _ => Err(ValidationError::MissingName),
    }
}

/// Parses a decimal typed by a person.
///
/// Surrounding whitespace is ignored. Either `.` or a single `,` is accepted
/// as the decimal separator, but not both in one value. There is no
/// thousands separator: `1,000` is one.
pub fn parse_decimal(input: Option<&str>) -> Result<Decimal, ValidationError> {
    let text = input.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(ValidationError::InvalidNumber);
    }

    let normalized = match text.matches(',').count() {
        0 => text.to_string(),
        1 if !text.contains('.') => text.replace(',', "."),
        _ => return Err(ValidationError::InvalidNumber),
    };

    Decimal::from_str(&normalized).map_err(|_| ValidationError::InvalidNumber)
}

/// An absent price is allowed; a negative one is not.
pub fn validate_price(price: Option<Decimal>) -> Result<Option<Decimal>, ValidationError> {
    match price {
        Some(value) if value.is_sign_negative() && !value.is_zero() => {
            Err(ValidationError::NegativePrice)
        }
        other => Ok(other),
    }
}
