//! Data models for the hourly rate client.
//!
//! Records and configuration values are owned by the rate service; the
//! client shapes requests and reads responses.

mod approval;
mod calculation;
mod hourly_rate;
mod query;
mod settings;
mod statistics;

pub use approval::{
    ApprovalResult, ApprovalStatus, BulkApprovalItem, BulkApprovalOutcome, BulkApprovalRequest,
    BulkApprovalResponse,
};
pub use calculation::{CalculationRequest, MonthlyEquivalentCalculation};
pub use hourly_rate::{DeleteOutcome, HourlyRatePatch, HourlyRateRecord, NewHourlyRate, RateStatus};
pub use query::{RateFilter, RatePage};
pub use settings::{OvertimeMultipliers, StandardHoursConfig, StandardHoursOverride};
pub use statistics::{RateStatistics, UpcomingRateChange};
