//! Aggregate statistics and upcoming rate changes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate figures over all hourly rate records.
///
/// The server may omit any figure; counts default to zero and wage figures
/// to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateStatistics {
    /// Total number of records.
    #[serde(default)]
    pub total_rates: u64,
    /// Records in draft.
    #[serde(default)]
    pub draft_rates: u64,
    /// Records currently active.
    #[serde(default)]
    pub active_rates: u64,
    /// Expired records.
    #[serde(default)]
    pub expired_rates: u64,
    /// Suspended records.
    #[serde(default)]
    pub suspended_rates: u64,
    /// Mean hourly wage across active records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_wage: Option<Decimal>,
    /// Lowest active hourly wage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_wage: Option<Decimal>,
    /// Highest active hourly wage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_wage: Option<Decimal>,
}

impl RateStatistics {
    /// Records awaiting approval.
    pub fn pending_approval(&self) -> u64 {
        self.draft_rates
    }
}

/// A scheduled change to an employee's hourly rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingRateChange {
    /// The record that will take effect.
    pub rate_id: String,
    /// The employee affected.
    pub employee_id: String,
    /// Display name of the employee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    /// Wage in force today, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_wage: Option<Decimal>,
    /// Wage that takes effect.
    pub new_wage: Decimal,
    /// Date the new wage takes effect.
    pub effective_date: NaiveDate,
}

impl UpcomingRateChange {
    /// Difference between the new and current wage, when both are known.
    pub fn wage_delta(&self) -> Option<Decimal> {
        self.current_wage.map(|current| self.new_wage - current)
    }
}
