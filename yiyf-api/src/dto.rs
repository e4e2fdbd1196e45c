//! DTOs for API requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"OK"`
    pub status: String,
    /// Server time
    pub timestamp: DateTime<Utc>,
}

/// Request to replace the curated program list.
///
/// `programs` is kept as raw JSON so a non-array payload can be reported as a
/// validation failure instead of a deserialization error.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    /// Program records
    #[serde(default)]
    pub programs: serde_json::Value,
}

/// Response for refresh and update.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramsChangedResponse {
    /// Always true; failures use the error shape
    pub success: bool,
    /// Human-readable summary
    pub message: String,
    /// Number of records now served or stored
    pub count: usize,
    /// Timestamp of the new data
    pub last_updated: DateTime<Utc>,
}
