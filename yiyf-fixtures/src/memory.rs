//! In-memory fixture store.

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use yiyf_core::error::Result;
use yiyf_core::traits::FixtureStore;
use yiyf_core::types::FixtureData;

use crate::defaults::default_fixture;

/// In-memory fixture store. Contents are lost when the process exits.
#[derive(Debug)]
pub struct MemoryFixtureStore {
    data: RwLock<FixtureData>,
}

impl MemoryFixtureStore {
    /// Creates a store holding the built-in baseline.
    pub fn new() -> Self {
        Self::with_data(default_fixture())
    }

    /// Creates a store holding `data`.
    pub fn with_data(data: FixtureData) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Returns a copy of the current snapshot.
    pub fn snapshot(&self) -> FixtureData {
        self.data.read().clone()
    }
}

impl Default for MemoryFixtureStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FixtureStore for MemoryFixtureStore {
    async fn load(&self) -> Result<FixtureData> {
        Ok(self.snapshot())
    }

    async fn save(&self, data: &FixtureData) -> Result<()> {
        debug!(count = data.len(), "Replacing in-memory fixture");
        *self.data.write() = data.clone();
        Ok(())
    }
}
