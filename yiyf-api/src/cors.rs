//! Origin policy and the CORS layer built from it.
//!
//! Outside production every origin is accepted. In production a request
//! without an `Origin` header is accepted (same-origin page loads, curl,
//! health probes); otherwise the origin must match an allow-list entry, where
//! a single `*` stands for one DNS label sequence, e.g. `https://*.cloudtype.app`.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, request::Parts, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

/// Which `Origin` values may call the API.
#[derive(Clone, Debug)]
pub struct OriginPolicy {
    allow_any: bool,
    patterns: Vec<String>,
}

impl OriginPolicy {
    /// Accepts every origin.
    pub fn allow_any() -> Self {
        Self {
            allow_any: true,
            patterns: Vec::new(),
        }
    }

    /// Accepts only origins matching one of `patterns`.
    pub fn allow_list(patterns: &[String]) -> Self {
        Self {
            allow_any: false,
            patterns: patterns.to_vec(),
        }
    }

    /// Returns true if a request carrying `origin` may proceed.
    pub fn allows(&self, origin: &str) -> bool {
        self.allow_any || self.patterns.iter().any(|p| pattern_matches(p, origin))
    }

    /// Builds the CORS layer for this policy.
    pub fn layer(&self) -> CorsLayer {
        let policy = self.clone();

        CorsLayer::new()
            .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _: &Parts| {
                origin.to_str().map(|o| policy.allows(o)).unwrap_or(false)
            }))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true)
    }
}

fn pattern_matches(pattern: &str, origin: &str) -> bool {
    let Some((prefix, suffix)) = pattern.split_once('*') else {
        return pattern == origin;
    };

    if origin.len() <= prefix.len() + suffix.len()
        || !origin.starts_with(prefix)
        || !origin.ends_with(suffix)
    {
        return false;
    }

    origin[prefix.len()..origin.len() - suffix.len()]
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
}

/// Rejects requests whose `Origin` the policy refuses with 403.
///
/// The CORS layer alone only withholds the response headers; the browser
/// still sends the request. This stops it before it reaches a handler.
pub async fn enforce_origin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        let allowed = origin
            .to_str()
            .map(|o| state.origins.allows(o))
            .unwrap_or(false);

        if !allowed {
            warn!(origin = ?origin, path = %request.uri().path(), "Origin rejected");
            return ApiError::Forbidden("CORS 정책에 의해 차단되었습니다.".into()).into_response();
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn production() -> OriginPolicy {
        OriginPolicy::allow_list(&[
            "https://*.cloudtype.app".to_string(),
            "https://*.cloudtype.io".to_string(),
            "https://board.example.org".to_string(),
        ])
    }

    #[test_case("https://yiyf.cloudtype.app", true ; "wildcard subdomain")]
    #[test_case("https://a.b.cloudtype.io", true ; "nested subdomain")]
    #[test_case("https://board.example.org", true ; "exact entry")]
    #[test_case("https://cloudtype.app", false ; "bare domain")]
    #[test_case("http://yiyf.cloudtype.app", false ; "wrong scheme")]
    #[test_case("https://evil.com/.cloudtype.app", false ; "path smuggling")]
    #[test_case("https://yiyf.cloudtype.app.evil.com", false ; "suffix smuggling")]
    #[test_case("https://board.example.org.evil.com", false ; "exact entry prefix")]
    fn test_allow_list(origin: &str, expected: bool) {
        assert_eq!(production().allows(origin), expected);
    }

    #[test]
    fn test_allow_any() {
        assert!(OriginPolicy::allow_any().allows("http://localhost:5173"));
    }

    #[test]
    fn test_empty_allow_list_rejects_everything() {
        assert!(!OriginPolicy::allow_list(&[]).allows("https://yiyf.cloudtype.app"));
    }
}
