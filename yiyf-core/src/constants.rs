//! Defaults for the program board.
//!
//! Values mirror the production deployment: five minute cache, ten minute
//! background refresh, fifteen second page fetches, eight programs per scrape.

use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════════
// SOURCE SITE
// ═══════════════════════════════════════════════════════════════════════════════

/// Root of the foundation site. Used as the scrape target and as the default
/// `link` of a record that has none.
pub const DEFAULT_SOURCE_URL: &str = "https://www.yiyf.or.kr";

/// Placeholder stored in a period field when no dates could be found.
pub const UNKNOWN_PERIOD: &str = "정보 없음";

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE & REFRESH
// ═══════════════════════════════════════════════════════════════════════════════

/// How long a program snapshot stays fresh.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Interval of the background refresher.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Shortest refresher period; tokio intervals cannot tick at zero.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

// ═══════════════════════════════════════════════════════════════════════════════
// SCRAPING
// ═══════════════════════════════════════════════════════════════════════════════

/// Timeout of a single page fetch.
pub const DEFAULT_SCRAPE_TIMEOUT: Duration = Duration::from_secs(15);

/// Maximum number of programs kept from one scrape.
pub const DEFAULT_MAX_PROGRAMS: usize = 8;

/// Candidate text must be strictly longer than this many chars.
pub const MIN_CANDIDATE_CHARS: usize = 10;

/// Candidate text must be strictly shorter than this many chars.
pub const MAX_CANDIDATE_CHARS: usize = 80;

// ═══════════════════════════════════════════════════════════════════════════════
// FIXTURE SOURCES
// ═══════════════════════════════════════════════════════════════════════════════

/// `source` of the built-in fixture baseline.
pub const SOURCE_DEFAULT: &str = "default";

/// `source` written by a manual update through the API.
pub const SOURCE_MANUAL_UPDATE: &str = "manual_update";
