//! Hourly rate record model and its write payloads.
//!
//! Records are owned by the rate service. The client only shapes create and
//! update payloads and reads back what the server returns.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle state of an hourly rate record.
///
/// Transitions are decided by the server; the client only requests them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateStatus {
    /// Created but not yet approved.
    Draft,
    /// Approved and currently in force.
    Active,
    /// Superseded or past its end date.
    Expired,
    /// Temporarily withdrawn.
    Suspended,
}

impl RateStatus {
    /// Returns the wire name of the status, as serialized and logged.
    pub fn as_str(&self) -> &'static str {
        match self {
            RateStatus::Draft => "draft",
            RateStatus::Active => "active",
            RateStatus::Expired => "expired",
            RateStatus::Suspended => "suspended",
        }
    }
}

/// An hourly rate record as returned by the rate service.
///
/// # Example
///
/// ```
/// use hourly_rates::models::{HourlyRateRecord, RateStatus};
/// use chrono::NaiveDate;
///
/// let json = r#"{
///     "id": "rate_001",
///     "employee_id": "emp_001",
///     "hourly_wage": "25.50",
///     "status": "active",
///     "effective_date": "2025-07-01"
/// }"#;
/// let record: HourlyRateRecord = serde_json::from_str(json).unwrap();
/// assert_eq!(record.status, RateStatus::Active);
/// assert!(record.is_effective_on(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyRateRecord {
    /// Server-assigned identifier.
    pub id: String,
    /// The employee this rate applies to.
    pub employee_id: String,
    /// Display name of the employee, when the server includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    /// The hourly wage.
    pub hourly_wage: Decimal,
    /// Lifecycle state.
    pub status: RateStatus,
    /// First day the rate applies (inclusive).
    pub effective_date: NaiveDate,
    /// Last day the rate applies (inclusive), open-ended when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// User who created the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// User who last updated the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    /// User who approved the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    /// When the record was approved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    /// When the record was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// When the record was last updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl HourlyRateRecord {
    /// Returns true if `date` falls inside the record's effective range.
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        date >= self.effective_date && self.end_date.is_none_or(|end| date <= end)
    }
}

/// Payload for creating a new hourly rate.
///
/// `created_by` is attached by the client at send time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHourlyRate {
    /// The employee this rate applies to.
    pub employee_id: String,
    /// The hourly wage.
    pub hourly_wage: Decimal,
    /// First day the rate applies.
    pub effective_date: NaiveDate,
    /// Last day the rate applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Initial status; the server defaults to draft.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RateStatus>,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update for an hourly rate. Absent fields are left unchanged.
///
/// `updated_by` is attached by the client at send time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyRatePatch {
    /// New hourly wage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_wage: Option<Decimal>,
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RateStatus>,
    /// New effective date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<NaiveDate>,
    /// New end date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// New notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Result of deleting a rate.
///
/// Deleting an id that is already gone is not an error: the caller's goal
/// (the record no longer exists) is met either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// The server deleted the record.
    Deleted,
    /// The server reported the record as not found.
    AlreadyAbsent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_record(end_date: Option<NaiveDate>) -> HourlyRateRecord {
        HourlyRateRecord {
            id: "rate_001".to_string(),
            employee_id: "emp_001".to_string(),
            employee_name: None,
            hourly_wage: Decimal::from_str("25.50").unwrap(),
            status: RateStatus::Active,
            effective_date: date(2025, 7, 1),
            end_date,
            notes: None,
            created_by: None,
            updated_by: None,
            approved_by: None,
            approved_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_status_serializes_as_snake_case() {
        let json = serde_json::to_string(&RateStatus::Suspended).unwrap();
        assert_eq!(json, "\"suspended\"");
    }

    #[test]
    fn test_as_str_matches_wire_name() {
        for status in [
            RateStatus::Draft,
            RateStatus::Active,
            RateStatus::Expired,
            RateStatus::Suspended,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_open_ended_record_is_effective_after_start() {
        let record = create_test_record(None);
        assert!(!record.is_effective_on(date(2025, 6, 30)));
        assert!(record.is_effective_on(date(2025, 7, 1)));
        assert!(record.is_effective_on(date(2030, 1, 1)));
    }

    #[test]
    fn test_end_date_is_inclusive() {
        let record = create_test_record(Some(date(2025, 12, 31)));
        assert!(record.is_effective_on(date(2025, 12, 31)));
        assert!(!record.is_effective_on(date(2026, 1, 1)));
    }

    #[test]
    fn test_record_accepts_numeric_wage() {
        let json = r#"{
            "id": "rate_002",
            "employee_id": "emp_002",
            "hourly_wage": 30.25,
            "status": "draft",
            "effective_date": "2025-01-01",
            "created_by": "alice"
        }"#;
        let record: HourlyRateRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.hourly_wage, Decimal::from_str("30.25").unwrap());
        assert_eq!(record.created_by.as_deref(), Some("alice"));
        assert_eq!(record.end_date, None);
    }

    #[test]
    fn test_empty_patch_serializes_to_empty_object() {
        let json = serde_json::to_value(HourlyRatePatch::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_patch_omits_absent_fields() {
        let patch = HourlyRatePatch {
            hourly_wage: Some(Decimal::from_str("27.00").unwrap()),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "hourly_wage": "27.00" }));
    }
}
