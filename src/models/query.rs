//! List filters and paginated results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{RateError, RateResult};

use super::{HourlyRateRecord, RateStatus};

/// Filter parameters for listing hourly rates.
///
/// Every field is optional; an absent field imposes no filter and produces
/// no query parameter.
///
/// # Example
///
/// ```
/// use hourly_rates::models::{RateFilter, RateStatus};
///
/// let filter = RateFilter::new().page(2).limit(20).status(RateStatus::Active);
/// assert_eq!(filter.to_query().unwrap(), "page=2&limit=20&status=active");
/// assert_eq!(RateFilter::new().to_query().unwrap(), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateFilter {
    /// 1-based page number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Only records in this status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RateStatus>,
    /// Free-text search over employee name and notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Only records effective on or after this date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Only records effective on or before this date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Only records for this employee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
}

impl RateFilter {
    /// Creates an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page number.
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the page size.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Restricts results to one status.
    pub fn status(mut self, status: RateStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the free-text search term. Blank terms are ignored.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.trim().is_empty() {
            None
        } else {
            Some(search)
        };
        self
    }

    /// Restricts results to an effective date range.
    pub fn date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Restricts results to one employee.
    pub fn employee(mut self, employee_id: impl Into<String>) -> Self {
        self.employee_id = Some(employee_id.into());
        self
    }

    /// Serializes the filter as a URL query string, without the leading `?`.
    pub fn to_query(&self) -> RateResult<String> {
        serde_urlencoded::to_string(self).map_err(|e| RateError::Validation {
            field: "filter".to_string(),
            reason: e.to_string(),
        })
    }
}

/// One page of hourly rate records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatePage {
    /// Records on this page.
    #[serde(alias = "data", alias = "rates")]
    pub items: Vec<HourlyRateRecord>,
    /// Total number of matching records across all pages.
    #[serde(default)]
    pub total: u64,
    /// The page number returned.
    #[serde(default = "default_page")]
    pub page: u32,
    /// The page size used.
    #[serde(default)]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

impl RatePage {
    /// Number of pages needed to hold `total` records at `limit` per page.
    ///
    /// A zero limit means the server returned everything on one page.
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return if self.total == 0 { 0 } else { 1 };
        }
        self.total.div_ceil(u64::from(self.limit))
    }

    /// Returns true if a page after this one exists.
    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }
}
