//! HTTP side of the scraper: fetch the listing page, hand it to a strategy.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use url::Url;

use yiyf_core::constants::{DEFAULT_MAX_PROGRAMS, DEFAULT_SCRAPE_TIMEOUT, DEFAULT_SOURCE_URL};
use yiyf_core::error::{Result, YiyfError};
use yiyf_core::traits::ProgramSource;
use yiyf_core::types::ProgramRecord;

use crate::heuristic::{ExtractStrategy, KeywordHeuristic};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Scraper configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Page to scrape
    pub url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Maximum number of programs per scrape
    pub max_programs: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.into(),
            timeout_seconds: DEFAULT_SCRAPE_TIMEOUT.as_secs(),
            max_programs: DEFAULT_MAX_PROGRAMS,
        }
    }
}

/// Scrapes program listings from the foundation's public site.
pub struct HtmlScraper {
    url: Url,
    http_client: reqwest::Client,
    strategy: Arc<dyn ExtractStrategy>,
}

impl HtmlScraper {
    /// Creates a scraper for the default site.
    pub fn new() -> Result<Self> {
        Self::with_config(ScraperConfig::default())
    }

    /// Creates a scraper using the keyword heuristic.
    pub fn with_config(config: ScraperConfig) -> Result<Self> {
        let strategy = Arc::new(KeywordHeuristic::with_max_programs(config.max_programs));
        Self::with_strategy(config, strategy)
    }

    /// Creates a scraper with a custom extraction strategy.
    pub fn with_strategy(config: ScraperConfig, strategy: Arc<dyn ExtractStrategy>) -> Result<Self> {
        let url = Url::parse(&config.url)
            .map_err(|e| YiyfError::ConfigError(format!("invalid scrape URL {}: {}", config.url, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("ko-KR,ko;q=0.9,en;q=0.8"));

        let http_client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| YiyfError::ConfigError(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url,
            http_client,
            strategy,
        })
    }

    /// Returns the page being scraped.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Downloads the listing page.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch_html(&self) -> Result<String> {
        let response = self
            .http_client
            .get(self.url.clone())
            .send()
            .await
            .map_err(map_request_error)?;

        if !response.status().is_success() {
            return Err(YiyfError::HttpError(format!(
                "{} returned status {}",
                self.url,
                response.status()
            )));
        }

        let html = response.text().await.map_err(map_request_error)?;
        debug!(bytes = html.len(), "Listing page downloaded");
        Ok(html)
    }
}

#[async_trait]
impl ProgramSource for HtmlScraper {
    async fn fetch_programs(&self) -> Result<Vec<ProgramRecord>> {
        let html = self.fetch_html().await?;
        let records = self.strategy.extract(&html, &self.url);
        info!(url = %self.url, count = records.len(), "Scrape finished");
        Ok(records)
    }
}

fn map_request_error(e: reqwest::Error) -> YiyfError {
    if e.is_timeout() {
        YiyfError::ConnectionTimeout(e.to_string())
    } else {
        YiyfError::HttpError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"
        <html><body>
          <div id="notice">
            <ul>
              <li><a href="/board/view?id=7">꿈드림 2025년 나+너=드림 멘토 모집 안내</a>
                  <span>2025-09-08 ~ 2025-09-30</span></li>
            </ul>
          </div>
        </body></html>
    "#;

    fn config(server: &MockServer) -> ScraperConfig {
        ScraperConfig {
            url: format!("{}/main/", server.uri()),
            timeout_seconds: 1,
            max_programs: 8,
        }
    }

    #[tokio::test]
    async fn test_scrape_sends_browser_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/main/"))
            .and(header_exists("user-agent"))
            .and(header("accept-language", "ko-KR,ko;q=0.9,en;q=0.8"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .expect(1)
            .mount(&server)
            .await;

        let scraper = HtmlScraper::with_config(config(&server)).unwrap();
        let records = scraper.fetch_programs().await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "꿈드림 2025년 나+너=드림 멘토 모집 안내");
        assert_eq!(records[0].application_period, "2025-09-08 ~ 2025-09-30");
        assert_eq!(
            records[0].link.as_deref(),
            Some(format!("{}/board/view?id=7", server.uri()).as_str())
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let scraper = HtmlScraper::with_config(config(&server)).unwrap();
        let err = scraper.fetch_programs().await.unwrap_err();

        assert!(matches!(err, YiyfError::HttpError(_)));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_slow_site_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(PAGE)
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let scraper = HtmlScraper::with_config(config(&server)).unwrap();
        let err = scraper.fetch_programs().await.unwrap_err();

        assert!(matches!(err, YiyfError::ConnectionTimeout(_)));
    }

    #[tokio::test]
    async fn test_page_without_programs_is_empty_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>점검 중</body></html>"))
            .mount(&server)
            .await;

        let scraper = HtmlScraper::with_config(config(&server)).unwrap();
        assert!(scraper.fetch_programs().await.unwrap().is_empty());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let config = ScraperConfig {
            url: "not a url".into(),
            ..Default::default()
        };
        assert!(matches!(
            HtmlScraper::with_config(config),
            Err(YiyfError::ConfigError(_))
        ));
    }
}
