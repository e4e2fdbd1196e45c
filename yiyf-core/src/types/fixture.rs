//! Fixture snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::SOURCE_MANUAL_UPDATE;
use crate::types::ProgramRecord;

/// The manually curated program list used when scraping yields nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureData {
    /// Curated programs, in display order
    pub programs: Vec<ProgramRecord>,
    /// When the list was last written
    pub last_updated: DateTime<Utc>,
    /// Who wrote it (`"default"`, `"manual_update"`, ...)
    pub source: String,
}

impl FixtureData {
    /// Creates a snapshot from an API update.
    pub fn manual_update(programs: Vec<ProgramRecord>, now: DateTime<Utc>) -> Self {
        Self {
            programs,
            last_updated: now,
            source: SOURCE_MANUAL_UPDATE.into(),
        }
    }

    /// Number of programs.
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    /// Returns true if there are no programs.
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}
