//! Monthly equivalent calculation inputs and results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::DEFAULT_OVERTIME_MULTIPLIER;

/// Inputs of a monthly equivalent calculation.
///
/// Used as the body of the server-side `POST /calculate` and as the input of
/// the local preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// Base hourly rate.
    pub hourly_rate: Decimal,
    /// Standard (non-overtime) hours in the month.
    pub standard_hours: Decimal,
    /// Overtime hours in the month.
    #[serde(default)]
    pub overtime_hours: Decimal,
    /// Factor applied to the hourly rate for overtime hours.
    #[serde(default = "default_multiplier")]
    pub overtime_multiplier: Decimal,
}

fn default_multiplier() -> Decimal {
    DEFAULT_OVERTIME_MULTIPLIER
}

impl CalculationRequest {
    /// Creates a request with no overtime and the default multiplier.
    pub fn new(hourly_rate: Decimal, standard_hours: Decimal) -> Self {
        Self {
            hourly_rate,
            standard_hours,
            overtime_hours: Decimal::ZERO,
            overtime_multiplier: DEFAULT_OVERTIME_MULTIPLIER,
        }
    }

    /// Sets the overtime hours and multiplier.
    pub fn with_overtime(mut self, hours: Decimal, multiplier: Decimal) -> Self {
        self.overtime_hours = hours;
        self.overtime_multiplier = multiplier;
        self
    }
}

/// Result of a monthly equivalent calculation.
///
/// Derived from its inputs and never persisted. Monetary fields are rounded
/// to 2 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyEquivalentCalculation {
    /// `hourly_rate × standard_hours`.
    pub regular_pay: Decimal,
    /// `hourly_rate × overtime_hours × overtime_multiplier`.
    pub overtime_pay: Decimal,
    /// `regular_pay + overtime_pay`.
    pub total_monthly_equivalent: Decimal,
    /// `standard_hours + overtime_hours`.
    pub total_hours: Decimal,
    /// `total_monthly_equivalent / total_hours`, or zero with no hours.
    pub effective_hourly_rate: Decimal,
}
