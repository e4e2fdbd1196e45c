//! # YIYF Cache
//!
//! Single-slot TTL cache for program listings and the service that keeps it
//! filled: scrape first, fall back to the fixture store, and as a last resort
//! serve a hard-coded list.
//!
//! ## Example
//!
//! ```rust,ignore
//! use yiyf_cache::{ProgramCacheService, ServiceConfig};
//!
//! let service = Arc::new(ProgramCacheService::new(ServiceConfig::default(), scraper, fixtures));
//! let refresher = service.spawn_refresher(Duration::from_secs(600));
//!
//! let view = service.get_cached_or_refresh().await;
//! println!("{} programs ({})", view.records.len(), view.status.as_str());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cache;
mod fallback;
mod service;

pub use cache::{CacheConfig, ProgramCache, Snapshot};
pub use fallback::fallback_programs;
pub use service::{
    CacheStatus, ProgramCacheService, ProgramOrigin, ProgramsView, RefreshOutcome, ServiceConfig,
};
