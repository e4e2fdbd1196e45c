//! In-memory TTL slot for the program snapshot.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use yiyf_core::constants::DEFAULT_CACHE_TTL;
use yiyf_core::types::ProgramRecord;

/// One complete, normalized program list.
///
/// Snapshots are immutable; a refresh replaces the whole snapshot, so readers
/// never observe a partially written list.
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// Normalized records in display order
    pub records: Arc<Vec<ProgramRecord>>,
    /// Wall-clock time of adoption
    pub updated_at: DateTime<Utc>,
    stored_at: Instant,
}

impl Snapshot {
    /// Time since adoption.
    pub fn age(&self) -> Duration {
        self.stored_at.elapsed()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the snapshot holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL in seconds
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_CACHE_TTL.as_secs(),
        }
    }
}

/// Single-slot program cache.
///
/// Thread-safe; the lock is only held to swap or clone the `Arc`.
pub struct ProgramCache {
    slot: RwLock<Option<Snapshot>>,
    config: CacheConfig,
}

impl ProgramCache {
    /// Creates a cold cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a cold cache with custom configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            slot: RwLock::new(None),
            config,
        }
    }

    /// The configured TTL.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.config.ttl_seconds)
    }

    /// Returns true once `snapshot` is older than the TTL.
    pub fn is_stale(&self, snapshot: &Snapshot) -> bool {
        snapshot.age() > self.ttl()
    }

    /// Returns the snapshot if present and fresh.
    pub fn get_fresh(&self) -> Option<Snapshot> {
        self.slot
            .read()
            .as_ref()
            .filter(|s| !self.is_stale(s))
            .cloned()
    }

    /// Returns the snapshot even if stale.
    pub fn get(&self) -> Option<Snapshot> {
        self.slot.read().clone()
    }

    /// Adopts `records` as the new snapshot.
    pub fn store(&self, records: Vec<ProgramRecord>, updated_at: DateTime<Utc>) -> Snapshot {
        let snapshot = Snapshot {
            records: Arc::new(records),
            updated_at,
            stored_at: Instant::now(),
        };
        *self.slot.write() = Some(snapshot.clone());
        snapshot
    }

    /// Drops the snapshot; the next read goes cold.
    pub fn invalidate(&self) {
        self.slot.write().take();
    }

    /// Returns true if no snapshot is held.
    pub fn is_cold(&self) -> bool {
        self.slot.read().is_none()
    }
}

impl Default for ProgramCache {
    fn default() -> Self {
        Self::new()
    }
}
