//! Hourly wage validation.
//!
//! Wages are checked locally before any create or update request is sent.
//! Validation never panics: every input, including unparseable text,
//! yields a structured [`WageValidation`].

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{RateError, RateResult};

/// The statutory minimum hourly wage (18.00).
pub const MINIMUM_HOURLY_WAGE: Decimal = Decimal::from_parts(1800, 0, 0, false, 2);

/// The highest hourly wage the system accepts (500.00).
pub const MAXIMUM_HOURLY_WAGE: Decimal = Decimal::from_parts(50000, 0, 0, false, 2);

/// Inclusive bounds for a valid hourly wage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageBounds {
    /// Lowest accepted wage (inclusive).
    pub minimum: Decimal,
    /// Highest accepted wage (inclusive).
    pub maximum: Decimal,
}

impl Default for WageBounds {
    fn default() -> Self {
        Self {
            minimum: MINIMUM_HOURLY_WAGE,
            maximum: MAXIMUM_HOURLY_WAGE,
        }
    }
}

/// The outcome of validating an hourly wage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageValidation {
    /// True if the wage passed every check.
    pub valid: bool,
    /// Human-readable reasons for rejection; empty when valid.
    pub errors: Vec<String>,
}

impl WageValidation {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Converts a failed validation into [`RateError::Validation`].
    ///
    /// # Example
    ///
    /// ```
    /// use hourly_rates::calculation::{validate_wage, WageBounds};
    ///
    /// let err = validate_wage("12", &WageBounds::default()).into_result().unwrap_err();
    /// assert_eq!(err.to_string(), "Invalid hourly_wage: Hourly wage must be at least 18.00");
    /// ```
    pub fn into_result(self) -> RateResult<()> {
        if self.valid {
            Ok(())
        } else {
            Err(RateError::Validation {
                field: "hourly_wage".to_string(),
                reason: self.errors.join("; "),
            })
        }
    }
}

/// Validates a wage entered as text.
///
/// Surrounding whitespace is ignored and exponent forms such as `1.8e1` are
/// accepted. The wage is rejected when it is not a number, below
/// `bounds.minimum` or above `bounds.maximum`; both bounds are inclusive.
///
/// # Examples
///
/// ```
/// use hourly_rates::calculation::{validate_wage, WageBounds};
///
/// let bounds = WageBounds::default();
/// assert!(validate_wage("18.00", &bounds).valid);
/// assert!(validate_wage("500.00", &bounds).valid);
///
/// let result = validate_wage("abc", &bounds);
/// assert!(!result.valid);
/// assert_eq!(result.errors, vec!["Hourly wage must be a valid number"]);
/// ```
pub fn validate_wage(amount: &str, bounds: &WageBounds) -> WageValidation {
    let amount = amount.trim();
    match Decimal::from_str(amount).or_else(|_| Decimal::from_scientific(amount)) {
        Ok(parsed) => validate_wage_amount(parsed, bounds),
        Err(_) => {
            WageValidation::from_errors(vec!["Hourly wage must be a valid number".to_string()])
        }
    }
}

/// Validates an already parsed wage against `bounds`.
pub fn validate_wage_amount(amount: Decimal, bounds: &WageBounds) -> WageValidation {
    let mut errors = Vec::new();

    if amount < bounds.minimum {
        errors.push(format!("Hourly wage must be at least {}", bounds.minimum));
    }
    if amount > bounds.maximum {
        errors.push(format!("Hourly wage must not exceed {}", bounds.maximum));
    }

    WageValidation::from_errors(errors)
}
