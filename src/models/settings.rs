//! Shared payroll configuration values served by the rate service.
//!
//! Both types are read-mostly and sit behind the
//! [`ConfigCache`](crate::cache::ConfigCache).

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::DEFAULT_OVERTIME_MULTIPLIER;

/// Standard monthly hours, optionally refined per department or role.
///
/// # Example
///
/// ```
/// use hourly_rates::models::{StandardHoursConfig, StandardHoursOverride};
/// use rust_decimal::Decimal;
///
/// let config = StandardHoursConfig {
///     monthly_hours: Decimal::from(160),
///     weekly_hours: None,
///     daily_hours: None,
///     overrides: vec![StandardHoursOverride {
///         department: Some("nursing".to_string()),
///         role: None,
///         monthly_hours: Decimal::from(152),
///     }],
/// };
/// assert_eq!(config.hours_for(Some("nursing"), None), Decimal::from(152));
/// assert_eq!(config.hours_for(Some("kitchen"), None), Decimal::from(160));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardHoursConfig {
    /// Default standard monthly hours.
    pub monthly_hours: Decimal,
    /// Standard weekly hours, if the organisation defines them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_hours: Option<Decimal>,
    /// Standard daily hours, if the organisation defines them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_hours: Option<Decimal>,
    /// Department or role specific values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<StandardHoursOverride>,
}

/// A department and/or role specific standard hours value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardHoursOverride {
    /// Department the override applies to; any department when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Role the override applies to; any role when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Monthly hours for matching employees.
    pub monthly_hours: Decimal,
}

impl StandardHoursOverride {
    fn matches(&self, department: Option<&str>, role: Option<&str>) -> bool {
        let department_ok = self
            .department
            .as_deref()
            .is_none_or(|d| Some(d) == department);
        let role_ok = self.role.as_deref().is_none_or(|r| Some(r) == role);
        department_ok && role_ok
    }

    fn specificity(&self) -> u8 {
        u8::from(self.department.is_some()) + u8::from(self.role.is_some())
    }
}

impl StandardHoursConfig {
    /// Resolves monthly hours for an employee.
    ///
    /// The most specific matching override wins (department and role beats
    /// either alone); ties go to the first listed. Falls back to
    /// `monthly_hours`.
    pub fn hours_for(&self, department: Option<&str>, role: Option<&str>) -> Decimal {
        let mut best: Option<&StandardHoursOverride> = None;
        for candidate in self.overrides.iter().filter(|o| o.matches(department, role)) {
            if best.is_none_or(|b| candidate.specificity() > b.specificity()) {
                best = Some(candidate);
            }
        }
        best.map_or(self.monthly_hours, |o| o.monthly_hours)
    }
}

/// Named overtime multipliers, serialized as a flat JSON object.
///
/// # Example
///
/// ```
/// use hourly_rates::models::OvertimeMultipliers;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let multipliers: OvertimeMultipliers =
///     serde_json::from_str(r#"{"weekday_overtime": "1.5", "public_holiday": "2.5"}"#).unwrap();
/// assert_eq!(multipliers.weekday(), Decimal::from_str("1.5").unwrap());
/// assert_eq!(multipliers.get("public_holiday"), Some(Decimal::from_str("2.5").unwrap()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OvertimeMultipliers(BTreeMap<String, Decimal>);

impl OvertimeMultipliers {
    /// Name of the weekday overtime multiplier.
    pub const WEEKDAY: &'static str = "weekday_overtime";
    /// Name of the rest day overtime multiplier.
    pub const REST_DAY: &'static str = "rest_day";
    /// Name of the public holiday overtime multiplier.
    pub const PUBLIC_HOLIDAY: &'static str = "public_holiday";

    /// Builds a set from `(name, factor)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: Into<String>,
    {
        Self(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Looks up a multiplier by name.
    pub fn get(&self, name: &str) -> Option<Decimal> {
        self.0.get(name).copied()
    }

    /// The weekday overtime multiplier, or 1.5 when the server has none.
    pub fn weekday(&self) -> Decimal {
        self.get(Self::WEEKDAY).unwrap_or(DEFAULT_OVERTIME_MULTIPLIER)
    }

    /// Iterates over `(name, factor)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of named multipliers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no multipliers are defined.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
