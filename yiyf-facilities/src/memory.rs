//! In-memory facility store.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use yiyf_core::error::Result;
use yiyf_core::traits::FacilityStore;
use yiyf_core::types::Facility;

use crate::defaults::default_facilities;

/// In-memory facility store, used when no database is configured.
#[derive(Debug, Default)]
pub struct MemoryFacilityStore {
    facilities: DashMap<String, Facility>,
}

impl MemoryFacilityStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored facilities.
    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    /// Returns true if nothing has been seeded yet.
    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }
}

#[async_trait]
impl FacilityStore for MemoryFacilityStore {
    async fn initialize_default_facilities(&self) -> Result<()> {
        if !self.facilities.is_empty() {
            debug!(count = self.facilities.len(), "Facilities already present");
            return Ok(());
        }

        for facility in default_facilities() {
            self.facilities.insert(facility.id.clone(), facility);
        }
        debug!(count = self.facilities.len(), "Seeded default facilities");
        Ok(())
    }

    async fn facilities(&self) -> Result<Vec<Facility>> {
        let mut facilities: Vec<Facility> =
            self.facilities.iter().map(|entry| entry.value().clone()).collect();
        facilities.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(facilities)
    }
}
