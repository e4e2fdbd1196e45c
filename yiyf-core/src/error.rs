//! Error types for the program board.
//!
//! Every library crate returns `YiyfError`. Only the HTTP layer decides which
//! of these reach a client; scrape errors in particular are always recovered.

use thiserror::Error;

/// Result type alias using `YiyfError`.
pub type Result<T> = std::result::Result<T, YiyfError>;

/// Main error type for all program board operations.
#[derive(Debug, Error)]
pub enum YiyfError {
    // ═══════════════════════════════════════════════════════════════════════════
    // SCRAPE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Connection or read timeout.
    #[error("Connection timeout: {0}")]
    ConnectionTimeout(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // FIXTURE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Fixture file is unreadable or malformed.
    #[error("Fixture error: {0}")]
    FixtureError(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // FACILITY ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Facility store could not be initialized or queried.
    #[error("Facility store error: {0}")]
    FacilityError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Input validation failed.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl YiyfError {
    /// Returns true if this error is transient (the next refresh may succeed).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, YiyfError::HttpError(_) | YiyfError::ConnectionTimeout(_))
    }

    /// Returns true if this is a validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, YiyfError::ValidationError(_))
    }
}
