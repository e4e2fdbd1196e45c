//! API route handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName, StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use yiyf_core::error::YiyfError;
use yiyf_core::types::ProgramRecord;

use crate::dto::*;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

const X_CACHE_STATUS: HeaderName = HeaderName::from_static("x-cache-status");
const X_DATA_COUNT: HeaderName = HeaderName::from_static("x-data-count");

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".into(),
        timestamp: Utc::now(),
    })
}

/// GET /api/programs
///
/// Always answers 200 with a program list; refresh failures degrade to
/// previous or built-in data inside the service.
pub async fn list_programs(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let view = state.programs.get_cached_or_refresh().await;
    let last_modified = view.updated_at.unwrap_or_else(Utc::now);

    debug!(
        count = view.records.len(),
        status = view.status.as_str(),
        "Serving programs"
    );

    let headers = [
        (
            header::CACHE_CONTROL,
            format!("public, max-age={}", state.programs.cache().ttl().as_secs()),
        ),
        (header::LAST_MODIFIED, http_date(last_modified)),
        (X_CACHE_STATUS, view.status.as_str().to_string()),
        (X_DATA_COUNT, view.records.len().to_string()),
    ];

    (headers, Json(Vec::clone(&view.records)))
}

/// POST /api/programs/refresh
pub async fn refresh_programs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProgramsChangedResponse>> {
    let outcome = state
        .programs
        .force_refresh()
        .await
        .map_err(|e| ApiError::Refresh(e.to_string()))?;

    info!(
        count = outcome.snapshot.len(),
        origin = %outcome.origin,
        "Programs refreshed on request"
    );

    Ok(Json(ProgramsChangedResponse {
        success: true,
        message: "프로그램 데이터가 성공적으로 새로고침되었습니다.".into(),
        count: outcome.snapshot.len(),
        last_updated: outcome.snapshot.updated_at,
    }))
}

/// POST /api/programs/update
pub async fn update_programs(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<ProgramsChangedResponse>> {
    let Json(req) = payload.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge;
        }
        ApiError::validation(format!(
            "프로그램 데이터가 올바르지 않습니다: {}",
            rejection.body_text()
        ))
    })?;

    let programs = ProgramRecord::list_from_value(&req.programs)?;

    let data = state.programs.replace(programs).await.map_err(|e| match e {
        YiyfError::ValidationError(_) => ApiError::from(e),
        other => ApiError::Update(other.to_string()),
    })?;

    Ok(Json(ProgramsChangedResponse {
        success: true,
        message: "프로그램 데이터가 성공적으로 업데이트되었습니다.".into(),
        count: data.len(),
        last_updated: data.last_updated,
    }))
}

/// Fallback for anything no route or static file matched.
pub async fn not_found(uri: Uri) -> ApiError {
    debug!(path = %uri.path(), "No route");
    ApiError::not_found(uri.path())
}

/// RFC 7231 IMF-fixdate, as used by `Last-Modified`.
fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
