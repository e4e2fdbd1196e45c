//! Program cache service.
//!
//! Owns the cached snapshot and decides where fresh data comes from:
//!
//! ```text
//! get_cached_or_refresh ──fresh──▶ snapshot (HIT)
//!        │ stale / cold
//!        ▼
//!     refresh ──▶ scraper ──≥1 record──▶ normalize ──▶ adopt (MISS)
//!                    │ empty / error
//!                    ▼
//!                 fixture store ──▶ normalize ──▶ adopt (MISS)
//!                    │ error
//!                    ▼
//!          previous snapshot (HIT) or hard-coded fallback (MISS)
//! ```
//!
//! Refreshes are single-flight. While one is running, readers holding a stale
//! snapshot are served that snapshot instead of queueing behind the fetch.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};

use yiyf_core::constants::MIN_REFRESH_INTERVAL;
use yiyf_core::error::{Result, YiyfError};
use yiyf_core::traits::{FixtureStore, ProgramSource};
use yiyf_core::types::{FixtureData, ProgramRecord};

use crate::cache::{CacheConfig, ProgramCache, Snapshot};
use crate::fallback::fallback_programs;

/// Whether a read was served without refreshing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    /// Served from the in-memory snapshot
    Hit,
    /// Required a refresh (or the hard-coded fallback)
    Miss,
}

impl CacheStatus {
    /// Header value.
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

/// Where an adopted snapshot came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgramOrigin {
    /// The scraper returned at least one record
    Scrape,
    /// The fixture store
    Fixture,
}

impl fmt::Display for ProgramOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramOrigin::Scrape => f.write_str("scrape"),
            ProgramOrigin::Fixture => f.write_str("fixture"),
        }
    }
}

/// Result of a read.
#[derive(Clone, Debug)]
pub struct ProgramsView {
    /// Records to serve
    pub records: Arc<Vec<ProgramRecord>>,
    /// HIT or MISS
    pub status: CacheStatus,
    /// Adoption time of the served snapshot; `None` for the hard-coded fallback
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProgramsView {
    fn from_snapshot(snapshot: Snapshot, status: CacheStatus) -> Self {
        Self {
            records: snapshot.records,
            status,
            updated_at: Some(snapshot.updated_at),
        }
    }
}

/// Result of a successful refresh.
#[derive(Clone, Debug)]
pub struct RefreshOutcome {
    /// The adopted snapshot
    pub snapshot: Snapshot,
    /// Where it came from
    pub origin: ProgramOrigin,
}

/// Service configuration.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Cache TTL
    pub cache: CacheConfig,
    /// Default `link` for records without one
    pub source_root: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            source_root: yiyf_core::constants::DEFAULT_SOURCE_URL.into(),
        }
    }
}

/// Cached access to program listings.
pub struct ProgramCacheService {
    cache: ProgramCache,
    source: Arc<dyn ProgramSource>,
    fixtures: Arc<dyn FixtureStore>,
    source_root: String,
    refresh_guard: Mutex<()>,
}

impl ProgramCacheService {
    /// Creates a service with a cold cache.
    pub fn new(
        config: ServiceConfig,
        source: Arc<dyn ProgramSource>,
        fixtures: Arc<dyn FixtureStore>,
    ) -> Self {
        Self {
            cache: ProgramCache::with_config(config.cache),
            source,
            fixtures,
            source_root: config.source_root,
            refresh_guard: Mutex::new(()),
        }
    }

    /// The underlying cache.
    pub fn cache(&self) -> &ProgramCache {
        &self.cache
    }

    /// Returns cached programs, refreshing first if the cache is stale or cold.
    ///
    /// Never fails and never returns an empty list unless an adopted source
    /// was itself empty.
    pub async fn get_cached_or_refresh(&self) -> ProgramsView {
        if let Some(snapshot) = self.cache.get_fresh() {
            debug!(count = snapshot.len(), "Program cache hit");
            return ProgramsView::from_snapshot(snapshot, CacheStatus::Hit);
        }

        let _guard = match self.refresh_guard.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                if let Some(stale) = self.cache.get() {
                    debug!("Refresh in flight, serving stale programs");
                    return ProgramsView::from_snapshot(stale, CacheStatus::Hit);
                }
                self.refresh_guard.lock().await
            }
        };

        // Another refresh may have completed while we were acquiring the guard.
        if let Some(snapshot) = self.cache.get_fresh() {
            return ProgramsView::from_snapshot(snapshot, CacheStatus::Hit);
        }

        match self.refresh_locked().await {
            Ok(outcome) => ProgramsView::from_snapshot(outcome.snapshot, CacheStatus::Miss),
            Err(err) => {
                error!(error = %err, "Program refresh failed, serving previous data");
                match self.cache.get() {
                    Some(previous) => ProgramsView::from_snapshot(previous, CacheStatus::Hit),
                    None => ProgramsView {
                        records: Arc::new(fallback_programs(Utc::now(), &self.source_root)),
                        status: CacheStatus::Miss,
                        updated_at: None,
                    },
                }
            }
        }
    }

    /// Scrapes (falling back to fixtures) and adopts the result.
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        let _guard = self.refresh_guard.lock().await;
        self.refresh_locked().await
    }

    /// Drops the cached snapshot, then refreshes.
    pub async fn force_refresh(&self) -> Result<RefreshOutcome> {
        let _guard = self.refresh_guard.lock().await;
        info!("Forced program refresh");
        self.cache.invalidate();
        self.refresh_locked().await
    }

    /// Replaces the fixture baseline and invalidates the cache.
    ///
    /// An empty list is rejected; `refresh` treats an empty fixture as an error.
    #[instrument(skip(self, programs), fields(count = programs.len()))]
    pub async fn replace(&self, programs: Vec<ProgramRecord>) -> Result<FixtureData> {
        if programs.is_empty() {
            return Err(YiyfError::ValidationError("programs must not be empty".into()));
        }
        for (idx, program) in programs.iter().enumerate() {
            program
                .validate()
                .map_err(|e| YiyfError::ValidationError(format!("programs[{}]: {}", idx, e)))?;
        }

        let _guard = self.refresh_guard.lock().await;
        let data = FixtureData::manual_update(programs, Utc::now());
        self.fixtures.save(&data).await?;
        self.cache.invalidate();

        info!(count = data.len(), "Fixture programs replaced");
        Ok(data)
    }

    /// Starts the periodic refresher.
    ///
    /// The first run happens one `every` after the call; the server performs
    /// its own initial load. Failures are logged and the loop keeps going.
    /// Periods below [`MIN_REFRESH_INTERVAL`] are raised to it.
    pub fn spawn_refresher(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let every = if every < MIN_REFRESH_INTERVAL {
            warn!(requested = ?every, "Refresh interval too short, using minimum");
            MIN_REFRESH_INTERVAL
        } else {
            every
        };
        let service = Arc::clone(self);
        let start = tokio::time::Instant::now() + every;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(start, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                debug!("Periodic program refresh starting");

                match service.refresh().await {
                    Ok(outcome) => info!(
                        count = outcome.snapshot.len(),
                        origin = %outcome.origin,
                        "Periodic program refresh complete"
                    ),
                    Err(err) => error!(error = %err, "Periodic program refresh failed"),
                }
            }
        })
    }

    /// Must be called with `refresh_guard` held.
    async fn refresh_locked(&self) -> Result<RefreshOutcome> {
        let now = Utc::now();

        match self.source.fetch_programs().await {
            Ok(raw) if !raw.is_empty() => {
                let records = raw
                    .into_iter()
                    .map(|r| r.normalize(now, None, &self.source_root))
                    .collect();
                return Ok(self.adopt(records, now, ProgramOrigin::Scrape));
            }
            Ok(_) => info!("Scrape found no programs, using fixture data"),
            Err(err) => warn!(error = %err, "Scrape failed, using fixture data"),
        }

        let fixture = self.fixtures.load().await?;
        if fixture.is_empty() {
            return Err(YiyfError::FixtureError("fixture has no programs".into()));
        }

        debug!(count = fixture.len(), source = %fixture.source, "Loaded fixture programs");
        let reported_at = fixture.last_updated;
        let records = fixture
            .programs
            .into_iter()
            .map(|r| r.normalize(now, Some(reported_at), &self.source_root))
            .collect();

        Ok(self.adopt(records, now, ProgramOrigin::Fixture))
    }

    fn adopt(
        &self,
        records: Vec<ProgramRecord>,
        now: DateTime<Utc>,
        origin: ProgramOrigin,
    ) -> RefreshOutcome {
        let snapshot = self.cache.store(records, now);
        info!(count = snapshot.len(), %origin, "Program cache updated");
        RefreshOutcome { snapshot, origin }
    }
}
