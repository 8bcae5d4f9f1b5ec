//! Typed client for the hourly rate service.

use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode, Url};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cache::ConfigSource;
use crate::calculation::{
    try_preview_monthly_equivalent, validate_wage, validate_wage_amount, WageValidation,
};
use crate::config::ClientConfig;
use crate::error::{RateError, RateResult};
use crate::models::{
    BulkApprovalOutcome, BulkApprovalRequest, BulkApprovalResponse, CalculationRequest,
    DeleteOutcome, HourlyRatePatch, HourlyRateRecord, MonthlyEquivalentCalculation,
    NewHourlyRate, OvertimeMultipliers, RateFilter, RatePage, RateStatistics,
    StandardHoursConfig, UpcomingRateChange,
};

use super::credentials::{IdentityProvider, TokenSource, FALLBACK_USER};
use super::response::{decode_body, decode_optional_body, error_from_body};

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Days ahead looked at by [`RateClient::upcoming_changes`] when callers
/// have no preference.
pub const DEFAULT_UPCOMING_DAYS: u32 = 30;

const RATE_RESOURCE: &str = "hourly rate";

#[derive(Serialize)]
struct CreateRateBody<'a> {
    #[serde(flatten)]
    rate: &'a NewHourlyRate,
    created_by: String,
}

#[derive(Serialize)]
struct UpdateRateBody<'a> {
    #[serde(flatten)]
    patch: &'a HourlyRatePatch,
    updated_by: String,
}

#[derive(Serialize)]
struct ApproveBody {
    approved_by: String,
}

#[derive(Serialize)]
struct StandardHoursBody<'a> {
    #[serde(flatten)]
    config: &'a StandardHoursConfig,
    updated_by: String,
}

/// Status and body of a completed HTTP exchange.
struct RawResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl RawResponse {
    fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }

    fn into_result<T: DeserializeOwned>(self) -> RateResult<T> {
        if self.status.is_success() {
            decode_body(&self.body)
        } else {
            Err(error_from_body(self.status.as_u16(), &self.body))
        }
    }

    /// Like [`into_result`](Self::into_result), but a 404 becomes
    /// [`RateError::NotFound`] for `id`.
    fn into_record<T: DeserializeOwned>(self, id: &str) -> RateResult<T> {
        if self.is_not_found() {
            return Err(RateError::NotFound {
                resource: RATE_RESOURCE.to_string(),
                id: id.to_string(),
            });
        }
        self.into_result()
    }
}

/// Client for the hourly rate service.
///
/// Every request reads the bearer token fresh from the injected
/// [`TokenSource`] and attributes writes to the user reported by the
/// injected [`IdentityProvider`] (or `"system"` when nobody is signed in).
///
/// Wages are validated locally before create and update requests; an
/// invalid wage never reaches the network.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use hourly_rates::client::{RateClient, Session};
/// use hourly_rates::config::ClientConfig;
/// use hourly_rates::models::{RateFilter, RateStatus};
///
/// # async fn run() -> hourly_rates::error::RateResult<()> {
/// let session = Session::new();
/// session.sign_in("jwt-token", "hr.admin");
///
/// let client = RateClient::new(
///     ClientConfig::with_api_root("https://hr.example.com/api"),
///     Arc::new(session.clone()),
///     Arc::new(session),
/// )?;
///
/// let page = client.list(&RateFilter::new().status(RateStatus::Draft)).await?;
/// let outcome = client.bulk_approve(page.items.iter().map(|r| r.id.clone())).await?;
/// println!("approved {:?}", outcome.approved_ids());
/// # Ok(())
/// # }
/// ```
pub struct RateClient {
    http: reqwest::Client,
    base: Url,
    config: ClientConfig,
    tokens: Arc<dyn TokenSource>,
    identity: Arc<dyn IdentityProvider>,
}

impl RateClient {
    /// Creates a client with a default HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`RateError::Validation`] if `config.api_root` is not an
    /// absolute URL.
    pub fn new(
        config: ClientConfig,
        tokens: Arc<dyn TokenSource>,
        identity: Arc<dyn IdentityProvider>,
    ) -> RateResult<Self> {
        Self::with_http_client(reqwest::Client::new(), config, tokens, identity)
    }

    /// Creates a client reusing an existing HTTP client.
    pub fn with_http_client(
        http: reqwest::Client,
        config: ClientConfig,
        tokens: Arc<dyn TokenSource>,
        identity: Arc<dyn IdentityProvider>,
    ) -> RateResult<Self> {
        let invalid_root = |reason: String| RateError::Validation {
            field: "api_root".to_string(),
            reason,
        };

        let base = Url::parse(&config.rates_url()).map_err(|e| invalid_root(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid_root(format!("'{}' cannot be used as a base URL", base)));
        }

        Ok(Self {
            http,
            base,
            config,
            tokens,
            identity,
        })
    }

    /// The configuration the client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Rate records
    // ---------------------------------------------------------------------

    /// Creates a rate, attributed to the current user.
    ///
    /// # Errors
    ///
    /// [`RateError::Validation`] if the wage is out of bounds (no request
    /// is sent); otherwise any network or API error.
    pub async fn create(&self, rate: &NewHourlyRate) -> RateResult<HourlyRateRecord> {
        self.check_wage(rate.hourly_wage)?;

        let body = CreateRateBody {
            rate,
            created_by: self.actor(),
        };
        let record: HourlyRateRecord = self
            .send(Method::POST, self.url(&[]), Some(&body))
            .await?
            .into_result()?;

        info!(
            rate_id = %record.id,
            employee_id = %record.employee_id,
            status = record.status.as_str(),
            "Created hourly rate"
        );
        Ok(record)
    }

    /// Lists rates matching `filter`.
    pub async fn list(&self, filter: &RateFilter) -> RateResult<RatePage> {
        let mut url = self.url(&[]);
        let query = filter.to_query()?;
        if !query.is_empty() {
            url.set_query(Some(&query));
        }
        self.get(url).await
    }

    /// Fetches one rate.
    ///
    /// # Errors
    ///
    /// [`RateError::NotFound`] if the server has no rate with this id.
    pub async fn get_by_id(&self, id: &str) -> RateResult<HourlyRateRecord> {
        self.send::<()>(Method::GET, self.url(&[id]), None)
            .await?
            .into_record(id)
    }

    /// Applies a partial update, attributed to the current user.
    ///
    /// # Errors
    ///
    /// [`RateError::Validation`] if the patch carries an out-of-bounds wage
    /// (no request is sent); [`RateError::NotFound`] if the rate is gone.
    pub async fn update(&self, id: &str, patch: &HourlyRatePatch) -> RateResult<HourlyRateRecord> {
        if let Some(wage) = patch.hourly_wage {
            self.check_wage(wage)?;
        }

        let body = UpdateRateBody {
            patch,
            updated_by: self.actor(),
        };
        self.send(Method::PUT, self.url(&[id]), Some(&body))
            .await?
            .into_record(id)
    }

    /// Deletes a rate.
    ///
    /// A rate that is already gone yields [`DeleteOutcome::AlreadyAbsent`]
    /// rather than an error, so repeating a delete is harmless.
    pub async fn delete(&self, id: &str) -> RateResult<DeleteOutcome> {
        let response = self.send::<()>(Method::DELETE, self.url(&[id]), None).await?;

        if response.is_not_found() {
            info!(rate_id = %id, "Hourly rate already absent");
            return Ok(DeleteOutcome::AlreadyAbsent);
        }
        if !response.status.is_success() {
            return Err(error_from_body(response.status.as_u16(), &response.body));
        }

        info!(rate_id = %id, "Deleted hourly rate");
        Ok(DeleteOutcome::Deleted)
    }

    /// Approves a rate on behalf of the current user.
    pub async fn approve(&self, id: &str) -> RateResult<HourlyRateRecord> {
        let body = ApproveBody {
            approved_by: self.actor(),
        };
        let record: HourlyRateRecord = self
            .send(Method::PUT, self.url(&[id, "approve"]), Some(&body))
            .await?
            .into_record(id)?;

        info!(rate_id = %id, status = record.status.as_str(), "Approved hourly rate");
        Ok(record)
    }

    /// Approves several rates in one request.
    ///
    /// Duplicate ids are sent once. The outcome has one entry per distinct
    /// id, in request order, so a partial failure still reports which ids
    /// were approved.
    ///
    /// # Errors
    ///
    /// [`RateError::Validation`] if `ids` is empty (no request is sent);
    /// any network or API error for the request as a whole.
    pub async fn bulk_approve<I>(&self, ids: I) -> RateResult<BulkApprovalOutcome>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for id in ids {
            let id = id.into();
            if !unique.contains(&id) {
                unique.push(id);
            }
        }

        if unique.is_empty() {
            return Err(RateError::Validation {
                field: "ids".to_string(),
                reason: "At least one rate id is required".to_string(),
            });
        }

        let body = BulkApprovalRequest {
            ids: unique,
            approved_by: self.actor(),
        };
        let response: BulkApprovalResponse = self
            .send(Method::POST, self.url(&["bulk-approve"]), Some(&body))
            .await?
            .into_result()?;

        let outcome = BulkApprovalOutcome::reconcile(&body.ids, response);
        let failed = outcome.failed_ids().len();
        let unreported = outcome.unreported_ids().len();
        if failed > 0 || unreported > 0 {
            warn!(
                requested = body.ids.len(),
                approved = outcome.approved_ids().len(),
                failed,
                unreported,
                "Bulk approval partially failed"
            );
        } else {
            info!(approved = body.ids.len(), "Bulk approval succeeded");
        }
        Ok(outcome)
    }

    // ---------------------------------------------------------------------
    // Employee projections
    // ---------------------------------------------------------------------

    /// All rates of one employee.
    pub async fn employee_rates(&self, employee_id: &str) -> RateResult<Vec<HourlyRateRecord>> {
        self.get(self.url(&["employee", employee_id])).await
    }

    /// The employee's rate currently in force, if any.
    pub async fn active_rate(&self, employee_id: &str) -> RateResult<Option<HourlyRateRecord>> {
        let response = self
            .send::<()>(Method::GET, self.url(&["employee", employee_id, "active"]), None)
            .await?;

        if response.is_not_found() {
            return Ok(None);
        }
        if !response.status.is_success() {
            return Err(error_from_body(response.status.as_u16(), &response.body));
        }
        decode_optional_body(&response.body)
    }

    /// The employee's rate history, as ordered by the server.
    pub async fn rate_history(&self, employee_id: &str) -> RateResult<Vec<HourlyRateRecord>> {
        self.get(self.url(&["employee", employee_id, "history"]))
            .await
    }

    // ---------------------------------------------------------------------
    // Calculations and reporting
    // ---------------------------------------------------------------------

    /// Runs the authoritative monthly equivalent calculation on the server.
    pub async fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> RateResult<MonthlyEquivalentCalculation> {
        self.send(Method::POST, self.url(&["calculate"]), Some(request))
            .await?
            .into_result()
    }

    /// Aggregate figures over all rates.
    pub async fn statistics(&self) -> RateResult<RateStatistics> {
        self.get(self.url(&["statistics"])).await
    }

    /// Rate changes taking effect within the next `days` days.
    pub async fn upcoming_changes(&self, days: u32) -> RateResult<Vec<UpcomingRateChange>> {
        let mut url = self.url(&["upcoming-changes"]);
        url.query_pairs_mut().append_pair("days", &days.to_string());
        self.get(url).await
    }

    // ---------------------------------------------------------------------
    // Shared configuration
    // ---------------------------------------------------------------------

    /// Fetches the standard hours. Prefer [`ConfigCache`](crate::cache::ConfigCache)
    /// for repeated reads.
    pub async fn standard_hours(&self) -> RateResult<StandardHoursConfig> {
        self.get(self.url(&["config", "standard-hours"])).await
    }

    /// Replaces the standard hours, attributed to the current user.
    pub async fn update_standard_hours(
        &self,
        config: &StandardHoursConfig,
    ) -> RateResult<StandardHoursConfig> {
        let body = StandardHoursBody {
            config,
            updated_by: self.actor(),
        };
        let stored: StandardHoursConfig = self
            .send(Method::PUT, self.url(&["config", "standard-hours"]), Some(&body))
            .await?
            .into_result()?;

        info!(monthly_hours = %stored.monthly_hours, "Updated standard hours");
        Ok(stored)
    }

    /// Fetches the overtime multipliers. Prefer
    /// [`ConfigCache`](crate::cache::ConfigCache) for repeated reads.
    pub async fn overtime_multipliers(&self) -> RateResult<OvertimeMultipliers> {
        self.get(self.url(&["config", "overtime-multipliers"]))
            .await
    }

    // ---------------------------------------------------------------------
    // Local previews
    // ---------------------------------------------------------------------

    /// Validates a wage typed by the user against the configured bounds.
    pub fn validate_wage(&self, amount: &str) -> WageValidation {
        validate_wage(amount, &self.config.wage_bounds)
    }

    /// Previews the monthly equivalent locally, without a request.
    ///
    /// # Errors
    ///
    /// [`RateError::Validation`] if the inputs are too large to calculate.
    pub fn preview_monthly_equivalent(
        &self,
        hourly_rate: Decimal,
        standard_hours: Decimal,
        overtime_hours: Decimal,
        overtime_multiplier: Decimal,
    ) -> RateResult<MonthlyEquivalentCalculation> {
        try_preview_monthly_equivalent(hourly_rate, standard_hours, overtime_hours, overtime_multiplier)
    }

    /// Formats an amount with the configured currency format.
    pub fn format_currency(&self, amount: Decimal) -> String {
        self.config.currency.format(amount)
    }

    // ---------------------------------------------------------------------
    // Plumbing
    // ---------------------------------------------------------------------

    fn check_wage(&self, wage: Decimal) -> RateResult<()> {
        validate_wage_amount(wage, &self.config.wage_bounds).into_result()
    }

    /// The user writes are attributed to.
    fn actor(&self) -> String {
        self.identity
            .current_user()
            .filter(|user| !user.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_USER.to_string())
    }

    /// Resource URL with `segments` appended; each segment is percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // The base was checked to be hierarchical at construction.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> RateResult<T> {
        self.send::<()>(Method::GET, url, None).await?.into_result()
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> RateResult<RawResponse> {
        let request_id = Uuid::new_v4();
        let path = url.path().to_string();

        let mut builder = self
            .http
            .request(method.clone(), url)
            .header(CONTENT_TYPE, "application/json")
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if let Some(token) = self.tokens.token().await {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        debug!(request_id = %request_id, method = %method, path = %path, "Sending rate service request");

        let response = builder.send().await.map_err(|e| {
            warn!(request_id = %request_id, method = %method, path = %path, error = %e, "Rate service unreachable");
            RateError::from(e)
        })?;

        let status = response.status();
        let body = response.bytes().await?.to_vec();

        // 404 is an expected answer for several operations.
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            warn!(request_id = %request_id, status = status.as_u16(), path = %path, "Rate service returned an error");
        } else {
            debug!(request_id = %request_id, status = status.as_u16(), path = %path, "Rate service responded");
        }

        Ok(RawResponse { status, body })
    }
}

#[async_trait::async_trait]
impl ConfigSource for RateClient {
    async fn fetch_standard_hours(&self) -> RateResult<StandardHoursConfig> {
        self.standard_hours().await
    }

    async fn fetch_overtime_multipliers(&self) -> RateResult<OvertimeMultipliers> {
        self.overtime_multipliers().await
    }

    async fn store_standard_hours(
        &self,
        config: &StandardHoursConfig,
    ) -> RateResult<StandardHoursConfig> {
        self.update_standard_hours(config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Anonymous, NoAuth, StaticIdentity};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    // Port 9 (discard) is never served in tests; any request that slipped
    // past local validation would fail with a network error instead.
    fn client_with(identity: Arc<dyn IdentityProvider>) -> RateClient {
        RateClient::new(
            ClientConfig::with_api_root("http://127.0.0.1:9/api/"),
            Arc::new(NoAuth),
            identity,
        )
        .unwrap()
    }

    fn client() -> RateClient {
        client_with(Arc::new(StaticIdentity::new("hr.admin")))
    }

    fn new_rate(wage: &str) -> NewHourlyRate {
        NewHourlyRate {
            employee_id: "emp_001".to_string(),
            hourly_wage: dec(wage),
            effective_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            end_date: None,
            status: None,
            notes: None,
        }
    }

    #[test]
    fn test_url_appends_encoded_segments() {
        let client = client();
        assert_eq!(
            client.url(&[]).as_str(),
            "http://127.0.0.1:9/api/hourly-rates"
        );
        assert_eq!(
            client.url(&["employee", "emp 1/a", "active"]).as_str(),
            "http://127.0.0.1:9/api/hourly-rates/employee/emp%201%2Fa/active"
        );
    }

    #[test]
    fn test_relative_api_root_is_rejected() {
        let result = RateClient::new(
            ClientConfig::with_api_root("/api"),
            Arc::new(NoAuth),
            Arc::new(Anonymous),
        );
        match result {
            Err(RateError::Validation { field, .. }) => assert_eq!(field, "api_root"),
            Err(other) => panic!("Expected Validation error, got {:?}", other),
            Ok(_) => panic!("Expected relative api_root to be rejected"),
        }
    }

    #[test]
    fn test_actor_falls_back_to_system() {
        assert_eq!(client().actor(), "hr.admin");
        assert_eq!(client_with(Arc::new(Anonymous)).actor(), "system");
        assert_eq!(
            client_with(Arc::new(StaticIdentity::new("  "))).actor(),
            "system"
        );
    }

    #[test]
    fn test_create_body_flattens_rate_and_attribution() {
        let rate = new_rate("25.00");
        let body = CreateRateBody {
            rate: &rate,
            created_by: "hr.admin".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "employee_id": "emp_001",
                "hourly_wage": "25.00",
                "effective_date": "2025-07-01",
                "created_by": "hr.admin"
            })
        );
    }

    #[tokio::test]
    async fn test_create_rejects_low_wage_before_sending() {
        let result = client().create(&new_rate("17.99")).await;
        match result {
            Err(RateError::Validation { field, reason }) => {
                assert_eq!(field, "hourly_wage");
                assert!(reason.contains("at least 18.00"));
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_rejects_high_wage_before_sending() {
        let patch = HourlyRatePatch {
            hourly_wage: Some(dec("500.01")),
            ..Default::default()
        };
        let result = client().update("rate_001", &patch).await;
        assert!(matches!(result, Err(RateError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_bulk_approve_rejects_empty_ids() {
        let result = client().bulk_approve(Vec::<String>::new()).await;
        match result {
            Err(RateError::Validation { field, .. }) => assert_eq!(field, "ids"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_local_helpers_use_configured_bounds_and_currency() {
        let mut config = ClientConfig::with_api_root("http://127.0.0.1:9/api");
        config.wage_bounds.minimum = dec("25");
        config.currency.symbol = "€".to_string();
        let client = RateClient::new(config, Arc::new(NoAuth), Arc::new(Anonymous)).unwrap();

        assert!(!client.validate_wage("24.99").valid);
        assert!(client.validate_wage("25").valid);
        assert_eq!(client.format_currency(dec("3500")), "€3,500.00");

        let preview = client
            .preview_monthly_equivalent(dec("20"), dec("160"), dec("10"), dec("1.5"))
            .unwrap();
        assert_eq!(preview.effective_hourly_rate, dec("20.59"));

        let overflow = client.preview_monthly_equivalent(Decimal::MAX, dec("2"), Decimal::ZERO, dec("1.5"));
        assert!(matches!(overflow, Err(RateError::Validation { ref field, .. }) if field == "hourly_rate"));
    }
}
