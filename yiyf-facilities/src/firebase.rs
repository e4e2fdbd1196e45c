//! Firebase Realtime Database facility store.
//!
//! Facilities live under `/facilities` as a map keyed by facility id. The REST
//! API returns `null` for a path that has never been written.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use url::Url;

use yiyf_core::error::{Result, YiyfError};
use yiyf_core::traits::FacilityStore;
use yiyf_core::types::Facility;

use crate::defaults::default_facilities;

/// Firebase connection settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct FirebaseConfig {
    /// Database root, e.g. `https://<project>.firebaseio.com`
    pub database_url: String,
    /// Database secret or ID token, sent as the `auth` query parameter
    pub auth_token: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl FirebaseConfig {
    /// Creates a config without authentication.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            auth_token: None,
            timeout_seconds: 10,
        }
    }

    /// Sets the auth token.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}

impl std::fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("database_url", &self.database_url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Facility store backed by a Firebase Realtime Database.
pub struct FirebaseFacilityStore {
    facilities_url: Url,
    http_client: reqwest::Client,
}

impl FirebaseFacilityStore {
    /// Creates a store. Fails if the database URL does not parse.
    pub fn new(config: FirebaseConfig) -> Result<Self> {
        let mut facilities_url = Url::parse(&format!(
            "{}/facilities.json",
            config.database_url.trim_end_matches('/')
        ))
        .map_err(|e| YiyfError::ConfigError(format!("invalid database URL: {}", e)))?;

        if let Some(token) = &config.auth_token {
            facilities_url.query_pairs_mut().append_pair("auth", token);
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| YiyfError::ConfigError(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            facilities_url,
            http_client,
        })
    }

    async fn check(response: reqwest::Response, action: &str) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        Err(YiyfError::FacilityError(format!(
            "{} failed with status {}: {}",
            action, status, text
        )))
    }
}

#[async_trait]
impl FacilityStore for FirebaseFacilityStore {
    #[instrument(skip(self))]
    async fn initialize_default_facilities(&self) -> Result<()> {
        let existing = self.facilities().await?;
        if !existing.is_empty() {
            debug!(count = existing.len(), "Facilities already present");
            return Ok(());
        }

        let defaults: BTreeMap<String, Facility> = default_facilities()
            .into_iter()
            .map(|f| (f.id.clone(), f))
            .collect();

        let response = self
            .http_client
            .put(self.facilities_url.clone())
            .json(&defaults)
            .send()
            .await
            .map_err(|e| YiyfError::FacilityError(e.to_string()))?;
        Self::check(response, "seeding facilities").await?;

        info!(count = defaults.len(), "Seeded default facilities");
        Ok(())
    }

    async fn facilities(&self) -> Result<Vec<Facility>> {
        let response = self
            .http_client
            .get(self.facilities_url.clone())
            .send()
            .await
            .map_err(|e| YiyfError::FacilityError(e.to_string()))?;
        let response = Self::check(response, "reading facilities").await?;

        let stored: Option<BTreeMap<String, Facility>> = response
            .json()
            .await
            .map_err(|e| YiyfError::FacilityError(format!("unexpected facility data: {}", e)))?;

        Ok(stored.unwrap_or_default().into_values().collect())
    }
}
