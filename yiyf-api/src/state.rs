//! App state: program service, facility store, config.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use yiyf_cache::{CacheConfig, ProgramCacheService, ServiceConfig};
use yiyf_core::constants::{
    DEFAULT_CACHE_TTL, DEFAULT_MAX_PROGRAMS, DEFAULT_REFRESH_INTERVAL, DEFAULT_SCRAPE_TIMEOUT,
    DEFAULT_SOURCE_URL,
};
use yiyf_core::error::Result;
use yiyf_core::traits::FacilityStore;
use yiyf_facilities::{FirebaseConfig, FirebaseFacilityStore, MemoryFacilityStore};
use yiyf_fixtures::FileFixtureStore;
use yiyf_scraper::{HtmlScraper, ScraperConfig};

use tracing::warn;

use crate::cors::OriginPolicy;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_ALLOWED_ORIGINS: &str = "https://*.cloudtype.app,https://*.cloudtype.io";

/// Deployment environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    /// Anything that is not production
    Development,
    /// Strict CORS, no error detail in responses
    Production,
}

impl Environment {
    /// Parses `APP_ENV`; only `production` (any case) selects production.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    /// Returns true in production.
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Server configuration, read from the environment (and `.env`).
#[derive(Clone)]
pub struct ApiConfig {
    /// Listen port (`PORT`)
    pub port: u16,
    /// `APP_ENV`
    pub environment: Environment,
    /// Static site root (`PUBLIC_DIR`)
    pub public_dir: PathBuf,
    /// Curated fixture file (`PROGRAMS_DATA_PATH`)
    pub programs_data_path: PathBuf,
    /// Default `link` for records without one (`SOURCE_URL`)
    pub source_url: String,
    /// Page to scrape (`SCRAPE_URL`, defaults to `source_url`)
    pub scrape_url: String,
    /// Per-fetch timeout (`SCRAPE_TIMEOUT_SECS`)
    pub scrape_timeout_seconds: u64,
    /// Result cap of one scrape (`SCRAPE_MAX_PROGRAMS`)
    pub max_programs: usize,
    /// Snapshot freshness (`CACHE_TTL_SECS`)
    pub cache_ttl_seconds: u64,
    /// Background refresh period (`REFRESH_INTERVAL_SECS`)
    pub refresh_interval_seconds: u64,
    /// Realtime Database root; facilities stay in memory without it
    pub firebase_database_url: Option<String>,
    /// Database secret or ID token
    pub firebase_auth_token: Option<String>,
    /// Origin patterns accepted in production (`CORS_ALLOWED_ORIGINS`)
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            environment: Environment::Development,
            public_dir: PathBuf::from("public"),
            programs_data_path: PathBuf::from("programs-data.json"),
            source_url: DEFAULT_SOURCE_URL.into(),
            scrape_url: DEFAULT_SOURCE_URL.into(),
            scrape_timeout_seconds: DEFAULT_SCRAPE_TIMEOUT.as_secs(),
            max_programs: DEFAULT_MAX_PROGRAMS,
            cache_ttl_seconds: DEFAULT_CACHE_TTL.as_secs(),
            refresh_interval_seconds: DEFAULT_REFRESH_INTERVAL.as_secs(),
            firebase_database_url: None,
            firebase_auth_token: None,
            cors_allowed_origins: split_list(DEFAULT_ALLOWED_ORIGINS),
        }
    }
}

impl ApiConfig {
    /// Loads `.env` if present, then reads the process environment.
    ///
    /// Unparsable values and zero durations or counts fall back to defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let source_url = lookup("SOURCE_URL").unwrap_or(defaults.source_url);

        Self {
            port: parse_or(&lookup, "PORT", defaults.port),
            environment: lookup("APP_ENV")
                .map(|v| Environment::parse(&v))
                .unwrap_or(defaults.environment),
            public_dir: lookup("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.public_dir),
            programs_data_path: lookup("PROGRAMS_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.programs_data_path),
            scrape_url: lookup("SCRAPE_URL").unwrap_or_else(|| source_url.clone()),
            source_url,
            scrape_timeout_seconds: positive_or(
                &lookup,
                "SCRAPE_TIMEOUT_SECS",
                defaults.scrape_timeout_seconds,
            ),
            max_programs: positive_or(&lookup, "SCRAPE_MAX_PROGRAMS", defaults.max_programs),
            cache_ttl_seconds: positive_or(&lookup, "CACHE_TTL_SECS", defaults.cache_ttl_seconds),
            refresh_interval_seconds: positive_or(
                &lookup,
                "REFRESH_INTERVAL_SECS",
                defaults.refresh_interval_seconds,
            ),
            firebase_database_url: non_empty("FIREBASE_DATABASE_URL"),
            firebase_auth_token: non_empty("FIREBASE_AUTH_TOKEN"),
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.cors_allowed_origins),
        }
    }

    /// Interval of the background refresher.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("port", &self.port)
            .field("environment", &self.environment)
            .field("public_dir", &self.public_dir)
            .field("programs_data_path", &self.programs_data_path)
            .field("source_url", &self.source_url)
            .field("scrape_url", &self.scrape_url)
            .field("cache_ttl_seconds", &self.cache_ttl_seconds)
            .field("refresh_interval_seconds", &self.refresh_interval_seconds)
            .field("firebase_database_url", &self.firebase_database_url)
            .field("firebase_auth_token", &self.firebase_auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish_non_exhaustive()
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Ignoring unparsable setting");
            default
        }),
        None => default,
    }
}

fn positive_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + PartialEq + Default + Copy,
{
    let value = parse_or(lookup, key, default);
    if value == T::default() {
        warn!(key, "Setting must be greater than zero, using default");
        return default;
    }
    value
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Shared handler state.
pub struct AppState {
    /// Server configuration
    pub config: ApiConfig,
    /// Cached program listings
    pub programs: Arc<ProgramCacheService>,
    /// Facility seeding backend
    pub facilities: Arc<dyn FacilityStore>,
    /// CORS and origin guard policy
    pub origins: OriginPolicy,
}

impl AppState {
    /// Builds state around prepared collaborators. Production gets the
    /// configured origin allow-list; other environments allow any origin.
    pub fn new(
        config: ApiConfig,
        programs: Arc<ProgramCacheService>,
        facilities: Arc<dyn FacilityStore>,
    ) -> Self {
        let origins = if config.environment.is_production() {
            OriginPolicy::allow_list(&config.cors_allowed_origins)
        } else {
            OriginPolicy::allow_any()
        };

        Self {
            config,
            programs,
            facilities,
            origins,
        }
    }

    /// Wires the real collaborators: site scraper, fixture file, and Firebase
    /// when a database URL is configured.
    pub fn from_config(config: ApiConfig) -> Result<Self> {
        let scraper = HtmlScraper::with_config(ScraperConfig {
            url: config.scrape_url.clone(),
            timeout_seconds: config.scrape_timeout_seconds,
            max_programs: config.max_programs,
        })?;
        let fixtures = FileFixtureStore::new(&config.programs_data_path);

        let service = ProgramCacheService::new(
            ServiceConfig {
                cache: CacheConfig {
                    ttl_seconds: config.cache_ttl_seconds,
                },
                source_root: config.source_url.clone(),
            },
            Arc::new(scraper),
            Arc::new(fixtures),
        );

        let facilities: Arc<dyn FacilityStore> = match &config.firebase_database_url {
            Some(url) => {
                let mut firebase = FirebaseConfig::new(url);
                firebase.auth_token = config.firebase_auth_token.clone();
                Arc::new(FirebaseFacilityStore::new(firebase)?)
            }
            None => Arc::new(MemoryFacilityStore::new()),
        };

        Ok(Self::new(config, Arc::new(service), facilities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("production", Environment::Production)]
    #[test_case("PRODUCTION", Environment::Production)]
    #[test_case("development", Environment::Development)]
    #[test_case("staging", Environment::Development)]
    #[test_case("", Environment::Development)]
    fn test_environment_parse(value: &str, expected: Environment) {
        assert_eq!(Environment::parse(value), expected);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(" https://a.example , ,https://*.cloudtype.io"),
            vec!["https://a.example", "https://*.cloudtype.io"]
        );
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.cache_ttl_seconds, 300);
        assert_eq!(config.refresh_interval(), Duration::from_secs(600));
        assert_eq!(config.cors_allowed_origins.len(), 2);
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_from_lookup_reads_settings() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("APP_ENV", "production"),
            ("SOURCE_URL", "https://example.org"),
            ("CACHE_TTL_SECS", "60"),
            ("FIREBASE_DATABASE_URL", "  "),
        ]));

        assert_eq!(config.port, 8080);
        assert!(config.environment.is_production());
        assert_eq!(config.scrape_url, "https://example.org");
        assert_eq!(config.cache_ttl_seconds, 60);
        assert!(config.firebase_database_url.is_none());
    }

    #[test_case("REFRESH_INTERVAL_SECS", "0")]
    #[test_case("CACHE_TTL_SECS", "0")]
    #[test_case("SCRAPE_TIMEOUT_SECS", "0")]
    #[test_case("SCRAPE_MAX_PROGRAMS", "0")]
    #[test_case("REFRESH_INTERVAL_SECS", "-5")]
    #[test_case("CACHE_TTL_SECS", "soon")]
    fn test_zero_or_invalid_settings_use_defaults(key: &str, value: &str) {
        let config = ApiConfig::from_lookup(lookup(&[(key, value)]));
        let defaults = ApiConfig::default();

        assert_eq!(config.refresh_interval_seconds, defaults.refresh_interval_seconds);
        assert_eq!(config.cache_ttl_seconds, defaults.cache_ttl_seconds);
        assert_eq!(config.scrape_timeout_seconds, defaults.scrape_timeout_seconds);
        assert_eq!(config.max_programs, defaults.max_programs);
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ApiConfig {
            firebase_auth_token: Some("s3cret".into()),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("s3cret"));
    }

    #[test]
    fn test_from_config_without_firebase_uses_memory() {
        let state = AppState::from_config(ApiConfig::default()).unwrap();
        assert!(state.config.firebase_database_url.is_none());
        assert!(state.programs.cache().is_cold());
    }
}
