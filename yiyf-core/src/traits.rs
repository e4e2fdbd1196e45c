//! Collaborator traits.
//!
//! The cache service only talks to these seams, so tests can swap the network
//! scraper or the fixture file for in-memory stand-ins.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Facility, FixtureData, ProgramRecord};

// ═══════════════════════════════════════════════════════════════════════════════
// PROGRAM SOURCE
// ═══════════════════════════════════════════════════════════════════════════════

/// Something that can produce raw program records, usually by scraping.
///
/// Records returned here are not yet normalized. An empty list is a valid
/// answer and means "nothing recognizable found".
#[async_trait]
pub trait ProgramSource: Send + Sync {
    /// Fetches the current program listings.
    async fn fetch_programs(&self) -> Result<Vec<ProgramRecord>>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// FIXTURE STORE
// ═══════════════════════════════════════════════════════════════════════════════

/// Durable store of the curated fallback program list.
#[async_trait]
pub trait FixtureStore: Send + Sync {
    /// Loads the current fixture snapshot.
    async fn load(&self) -> Result<FixtureData>;

    /// Replaces the fixture snapshot.
    async fn save(&self, data: &FixtureData) -> Result<()>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// FACILITY STORE
// ═══════════════════════════════════════════════════════════════════════════════

/// Backing store of the reservation subsystem.
///
/// The program board only needs the startup contract: seed the default
/// facilities once, and refuse to start if that fails.
#[async_trait]
pub trait FacilityStore: Send + Sync {
    /// Writes the default facility list if the store has none.
    async fn initialize_default_facilities(&self) -> Result<()>;

    /// Lists the stored facilities.
    async fn facilities(&self) -> Result<Vec<Facility>>;
}
