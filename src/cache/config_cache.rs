//! Time-to-live cache for the shared payroll configuration.
//!
//! Holds at most one entry per [`ConfigKind`]. Entries are refreshed only
//! when read after their TTL has elapsed; there is no background refresh.
//! Each kind keeps its own fetch timestamp, so refreshing one kind never
//! makes a stale value of the other look fresh.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::CacheTtls;
use crate::error::RateResult;
use crate::models::{OvertimeMultipliers, StandardHoursConfig};

use super::clock::{Clock, SystemClock};

/// The configuration resources held by the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigKind {
    /// Standard monthly hours.
    StandardHours,
    /// Named overtime multipliers.
    OvertimeMultipliers,
}

impl ConfigKind {
    /// Both kinds, in a fixed order.
    pub const ALL: [ConfigKind; 2] = [ConfigKind::StandardHours, ConfigKind::OvertimeMultipliers];

    /// The name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKind::StandardHours => "standard_hours",
            ConfigKind::OvertimeMultipliers => "overtime_multipliers",
        }
    }
}

/// A configuration value of either kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    /// Standard monthly hours.
    StandardHours(StandardHoursConfig),
    /// Named overtime multipliers.
    OvertimeMultipliers(OvertimeMultipliers),
}

/// Where the cache fetches configuration from.
///
/// [`RateClient`](crate::client::RateClient) implements this against the
/// rate service.
#[async_trait::async_trait]
pub trait ConfigSource: Send + Sync + 'static {
    /// Fetches the current standard hours.
    async fn fetch_standard_hours(&self) -> RateResult<StandardHoursConfig>;

    /// Fetches the current overtime multipliers.
    async fn fetch_overtime_multipliers(&self) -> RateResult<OvertimeMultipliers>;

    /// Replaces the standard hours, returning the stored value.
    async fn store_standard_hours(
        &self,
        config: &StandardHoursConfig,
    ) -> RateResult<StandardHoursConfig>;
}

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    fetched_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    fn is_fresh(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        now - self.fetched_at < ttl
    }
}

type Slot<T> = RwLock<Option<CacheEntry<T>>>;

/// Pull-based TTL cache for standard hours and overtime multipliers.
///
/// Construct one per application and share it (e.g. behind an `Arc`).
/// Reads never hold a lock across a network fetch, so two concurrent misses
/// may both fetch; the later write wins and both callers get a complete
/// value.
///
/// If a refresh fails while an older value is cached, the older value is
/// returned instead of the error. With nothing cached the error propagates.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use hourly_rates::cache::ConfigCache;
/// use hourly_rates::client::{NoAuth, RateClient, StaticIdentity};
/// use hourly_rates::config::ClientConfig;
///
/// # async fn run() -> hourly_rates::error::RateResult<()> {
/// let config = ClientConfig::default();
/// let client = RateClient::new(config.clone(), Arc::new(NoAuth), Arc::new(StaticIdentity::new("hr")))?;
/// let cache = ConfigCache::new(Arc::new(client), config.cache);
///
/// let hours = cache.standard_hours(false).await?;
/// println!("Standard hours: {}", hours.monthly_hours);
/// # Ok(())
/// # }
/// ```
pub struct ConfigCache {
    source: Arc<dyn ConfigSource>,
    clock: Arc<dyn Clock>,
    ttls: CacheTtls,
    standard_hours: Slot<StandardHoursConfig>,
    overtime_multipliers: Slot<OvertimeMultipliers>,
}

impl ConfigCache {
    /// Creates an empty cache using the system clock.
    pub fn new(source: Arc<dyn ConfigSource>, ttls: CacheTtls) -> Self {
        Self::with_clock(source, ttls, Arc::new(SystemClock))
    }

    /// Creates an empty cache using `clock` for expiry.
    pub fn with_clock(source: Arc<dyn ConfigSource>, ttls: CacheTtls, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            clock,
            ttls,
            standard_hours: RwLock::new(None),
            overtime_multipliers: RwLock::new(None),
        }
    }

    /// The TTL for `kind`.
    pub fn ttl(&self, kind: ConfigKind) -> TimeDelta {
        match kind {
            ConfigKind::StandardHours => self.ttls.standard_hours(),
            ConfigKind::OvertimeMultipliers => self.ttls.overtime_multipliers(),
        }
    }

    /// Returns the value for `kind`, fetching it when missing, expired or
    /// when `force_refresh` is set.
    pub async fn get(&self, kind: ConfigKind, force_refresh: bool) -> RateResult<ConfigValue> {
        match kind {
            ConfigKind::StandardHours => self
                .standard_hours(force_refresh)
                .await
                .map(ConfigValue::StandardHours),
            ConfigKind::OvertimeMultipliers => self
                .overtime_multipliers(force_refresh)
                .await
                .map(ConfigValue::OvertimeMultipliers),
        }
    }

    /// Returns the standard hours.
    pub async fn standard_hours(&self, force_refresh: bool) -> RateResult<StandardHoursConfig> {
        let source = Arc::clone(&self.source);
        self.get_or_fetch(
            ConfigKind::StandardHours,
            &self.standard_hours,
            force_refresh,
            || async move { source.fetch_standard_hours().await },
        )
        .await
    }

    /// Returns the overtime multipliers.
    pub async fn overtime_multipliers(
        &self,
        force_refresh: bool,
    ) -> RateResult<OvertimeMultipliers> {
        let source = Arc::clone(&self.source);
        self.get_or_fetch(
            ConfigKind::OvertimeMultipliers,
            &self.overtime_multipliers,
            force_refresh,
            || async move { source.fetch_overtime_multipliers().await },
        )
        .await
    }

    /// Writes new standard hours through to the source and caches the
    /// stored value as fresh.
    pub async fn update_standard_hours(
        &self,
        config: &StandardHoursConfig,
    ) -> RateResult<StandardHoursConfig> {
        let stored = self.source.store_standard_hours(config).await?;
        *self.standard_hours.write().await = Some(CacheEntry {
            value: stored.clone(),
            fetched_at: self.clock.now(),
        });
        debug!(kind = ConfigKind::StandardHours.as_str(), "Cached updated configuration");
        Ok(stored)
    }

    /// Clears every entry; the next read of any kind fetches.
    pub async fn invalidate(&self) {
        for kind in ConfigKind::ALL {
            self.invalidate_kind(kind).await;
        }
    }

    /// Clears the entry for one kind.
    pub async fn invalidate_kind(&self, kind: ConfigKind) {
        match kind {
            ConfigKind::StandardHours => *self.standard_hours.write().await = None,
            ConfigKind::OvertimeMultipliers => *self.overtime_multipliers.write().await = None,
        }
        debug!(kind = kind.as_str(), "Invalidated configuration cache entry");
    }

    /// When the cached value for `kind` was fetched, if one is cached.
    pub async fn fetched_at(&self, kind: ConfigKind) -> Option<DateTime<Utc>> {
        match kind {
            ConfigKind::StandardHours => {
                self.standard_hours.read().await.as_ref().map(|e| e.fetched_at)
            }
            ConfigKind::OvertimeMultipliers => self
                .overtime_multipliers
                .read()
                .await
                .as_ref()
                .map(|e| e.fetched_at),
        }
    }

    async fn get_or_fetch<T, F, Fut>(
        &self,
        kind: ConfigKind,
        slot: &Slot<T>,
        force_refresh: bool,
        fetch: F,
    ) -> RateResult<T>
    where
        T: Clone,
        F: FnOnce() -> Fut,
        Fut: Future<Output = RateResult<T>>,
    {
        if !force_refresh {
            let now = self.clock.now();
            let guard = slot.read().await;
            if let Some(entry) = guard.as_ref() {
                if entry.is_fresh(now, self.ttl(kind)) {
                    debug!(kind = kind.as_str(), "Configuration cache hit");
                    return Ok(entry.value.clone());
                }
            }
        }

        debug!(kind = kind.as_str(), force_refresh, "Fetching configuration");
        match fetch().await {
            Ok(value) => {
                *slot.write().await = Some(CacheEntry {
                    value: value.clone(),
                    fetched_at: self.clock.now(),
                });
                Ok(value)
            }
            Err(error) => {
                let guard = slot.read().await;
                match guard.as_ref() {
                    Some(stale) => {
                        warn!(
                            kind = kind.as_str(),
                            fetched_at = %stale.fetched_at,
                            error = %error,
                            "Configuration refresh failed, serving cached value"
                        );
                        Ok(stale.value.clone())
                    }
                    None => Err(error),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::error::RateError;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSource {
        hours_fetches: AtomicUsize,
        multiplier_fetches: AtomicUsize,
        stores: AtomicUsize,
        failing: AtomicBool,
    }

    impl CountingSource {
        fn hours_fetches(&self) -> usize {
            self.hours_fetches.load(Ordering::SeqCst)
        }

        fn multiplier_fetches(&self) -> usize {
            self.multiplier_fetches.load(Ordering::SeqCst)
        }

        fn fail(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        fn check(&self) -> RateResult<()> {
            if self.failing.load(Ordering::SeqCst) {
                Err(RateError::Network {
                    message: "connection refused".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[async_trait::async_trait]
    impl ConfigSource for CountingSource {
        async fn fetch_standard_hours(&self) -> RateResult<StandardHoursConfig> {
            let n = self.hours_fetches.fetch_add(1, Ordering::SeqCst) + 1;
            self.check()?;
            Ok(hours(160 + n as i64))
        }

        async fn fetch_overtime_multipliers(&self) -> RateResult<OvertimeMultipliers> {
            self.multiplier_fetches.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            Ok(OvertimeMultipliers::from_pairs([(
                OvertimeMultipliers::WEEKDAY,
                Decimal::new(15, 1),
            )]))
        }

        async fn store_standard_hours(
            &self,
            config: &StandardHoursConfig,
        ) -> RateResult<StandardHoursConfig> {
            self.stores.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            Ok(config.clone())
        }
    }

    fn hours(monthly: i64) -> StandardHoursConfig {
        StandardHoursConfig {
            monthly_hours: Decimal::from(monthly),
            weekly_hours: None,
            daily_hours: None,
            overrides: vec![],
        }
    }

    fn setup() -> (Arc<CountingSource>, Arc<ManualClock>, ConfigCache) {
        let source = Arc::new(CountingSource::default());
        let clock = Arc::new(ManualClock::default());
        let cache = ConfigCache::with_clock(source.clone(), CacheTtls::default(), clock.clone());
        (source, clock, cache)
    }

    #[tokio::test]
    async fn test_first_get_fetches_once_then_hits() {
        let (source, clock, cache) = setup();

        let first = cache.standard_hours(false).await.unwrap();
        assert_eq!(source.hours_fetches(), 1);

        clock.advance(TimeDelta::minutes(4));
        let second = cache.standard_hours(false).await.unwrap();
        assert_eq!(source.hours_fetches(), 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let (source, clock, cache) = setup();

        cache.standard_hours(false).await.unwrap();
        clock.advance(TimeDelta::minutes(5));
        let refreshed = cache.standard_hours(false).await.unwrap();

        assert_eq!(source.hours_fetches(), 2);
        assert_eq!(refreshed.monthly_hours, Decimal::from(162));
    }

    #[tokio::test]
    async fn test_force_refresh_always_fetches() {
        let (source, _clock, cache) = setup();

        cache.standard_hours(false).await.unwrap();
        cache.standard_hours(true).await.unwrap();
        assert_eq!(source.hours_fetches(), 2);
    }

    #[tokio::test]
    async fn test_multipliers_use_ten_minute_ttl() {
        let (source, clock, cache) = setup();

        cache.overtime_multipliers(false).await.unwrap();
        clock.advance(TimeDelta::minutes(9));
        cache.overtime_multipliers(false).await.unwrap();
        assert_eq!(source.multiplier_fetches(), 1);

        clock.advance(TimeDelta::minutes(1));
        cache.overtime_multipliers(false).await.unwrap();
        assert_eq!(source.multiplier_fetches(), 2);
    }

    #[tokio::test]
    async fn test_refreshing_one_kind_does_not_freshen_the_other() {
        let (source, clock, cache) = setup();

        cache.standard_hours(false).await.unwrap();
        clock.advance(TimeDelta::minutes(4));
        cache.overtime_multipliers(false).await.unwrap();
        clock.advance(TimeDelta::minutes(2));

        // Standard hours are now 6 minutes old even though multipliers are 2.
        cache.standard_hours(false).await.unwrap();
        cache.overtime_multipliers(false).await.unwrap();
        assert_eq!(source.hours_fetches(), 2);
        assert_eq!(source.multiplier_fetches(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_fetch_for_both_kinds() {
        let (source, _clock, cache) = setup();

        cache.standard_hours(false).await.unwrap();
        cache.overtime_multipliers(false).await.unwrap();
        cache.invalidate().await;

        assert!(cache.fetched_at(ConfigKind::StandardHours).await.is_none());
        cache.get(ConfigKind::StandardHours, false).await.unwrap();
        cache.get(ConfigKind::OvertimeMultipliers, false).await.unwrap();
        assert_eq!(source.hours_fetches(), 2);
        assert_eq!(source.multiplier_fetches(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_kind_leaves_other_kind_cached() {
        let (source, _clock, cache) = setup();

        cache.standard_hours(false).await.unwrap();
        cache.overtime_multipliers(false).await.unwrap();
        cache.invalidate_kind(ConfigKind::OvertimeMultipliers).await;

        cache.standard_hours(false).await.unwrap();
        cache.overtime_multipliers(false).await.unwrap();
        assert_eq!(source.hours_fetches(), 1);
        assert_eq!(source.multiplier_fetches(), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_serves_stale_value() {
        let (source, clock, cache) = setup();

        let original = cache.standard_hours(false).await.unwrap();
        clock.advance(TimeDelta::minutes(30));
        source.fail(true);

        let served = cache.standard_hours(false).await.unwrap();
        assert_eq!(served, original);
        assert_eq!(source.hours_fetches(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_without_entry_propagates() {
        let (source, _clock, cache) = setup();
        source.fail(true);

        let result = cache.overtime_multipliers(false).await;
        assert!(matches!(result, Err(RateError::Network { .. })));
    }

    #[tokio::test]
    async fn test_failed_fetch_after_invalidate_propagates() {
        let (source, _clock, cache) = setup();

        cache.standard_hours(false).await.unwrap();
        cache.invalidate().await;
        source.fail(true);

        assert!(cache.standard_hours(false).await.is_err());
    }

    #[tokio::test]
    async fn test_update_writes_through_and_caches() {
        let (source, clock, cache) = setup();

        let stored = cache.update_standard_hours(&hours(152)).await.unwrap();
        assert_eq!(stored.monthly_hours, Decimal::from(152));
        assert_eq!(source.stores.load(Ordering::SeqCst), 1);

        clock.advance(TimeDelta::minutes(1));
        let read = cache.standard_hours(false).await.unwrap();
        assert_eq!(read.monthly_hours, Decimal::from(152));
        assert_eq!(source.hours_fetches(), 0);
    }

    #[tokio::test]
    async fn test_failed_update_keeps_previous_entry() {
        let (source, _clock, cache) = setup();

        let original = cache.standard_hours(false).await.unwrap();
        source.fail(true);
        assert!(cache.update_standard_hours(&hours(100)).await.is_err());

        source.fail(false);
        assert_eq!(cache.standard_hours(false).await.unwrap(), original);
    }

    #[tokio::test]
    async fn test_fetched_at_is_tracked_per_kind() {
        let (_source, clock, cache) = setup();

        cache.standard_hours(false).await.unwrap();
        let hours_at = cache.fetched_at(ConfigKind::StandardHours).await.unwrap();
        clock.advance(TimeDelta::seconds(90));
        cache.overtime_multipliers(false).await.unwrap();
        let multipliers_at = cache
            .fetched_at(ConfigKind::OvertimeMultipliers)
            .await
            .unwrap();

        assert_eq!(multipliers_at - hours_at, TimeDelta::seconds(90));
    }

    #[test]
    fn test_ttl_per_kind() {
        let (_source, _clock, cache) = setup();
        assert_eq!(cache.ttl(ConfigKind::StandardHours), TimeDelta::minutes(5));
        assert_eq!(
            cache.ttl(ConfigKind::OvertimeMultipliers),
            TimeDelta::minutes(10)
        );
    }
}
