//! REST API endpoints.
//!
//! Axum-based HTTP API for querying weekly leaderboards, rivalries,
//! achievements and server preferences.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::calculate::{latest_date, select_window};
use crate::models::{Record, ReportWindow};
use crate::storage::StorageError;

use self::state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// `from`/`to` query parameters, both `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindowParams {
    pub from: Option<String>,
    pub to: Option<String>,
}

fn parse_param(name: &str, value: Option<&str>) -> Result<Option<chrono::NaiveDate>, ApiError> {
    match value {
        None => Ok(None),
        Some(raw) => crate::parse_date(raw).map(Some).ok_or_else(|| {
            ApiError::BadRequest(format!("Invalid {} date (expected YYYY-MM-DD): {}", name, raw))
        }),
    }
}

impl WindowParams {
    pub fn is_set(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// Resolve to a window. Without bounds this is the week ending on the
    /// newest record, or today when there are none.
    pub fn resolve(&self, records: &[Record]) -> Result<ReportWindow, ApiError> {
        let from = parse_param("from", self.from.as_deref())?;
        let to = parse_param("to", self.to.as_deref())?;
        let fallback = latest_date(records).unwrap_or_else(|| Utc::now().date_naive());

        select_window(from, to, fallback)
            .ok_or_else(|| ApiError::BadRequest("from must not be after to".to_string()))
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    if origin.trim() == "*" {
        return CorsLayer::permissive();
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods([Method::GET]),
        Err(e) => {
            warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
            CorsLayer::new()
        }
    }
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .route("/api/health", get(routes::health::health))
        .route("/api/report", get(routes::weekly::report))
        .route("/api/leaderboard", get(routes::weekly::leaderboard))
        .route("/api/leaderboard.csv", get(routes::weekly::leaderboard_csv))
        .route("/api/rivalries", get(routes::weekly::rivalries))
        .route("/api/achievements", get(routes::weekly::achievements))
        .route("/api/pulse", get(routes::weekly::pulse))
        .route("/api/players/:id", get(routes::weekly::player))
        .route("/api/servers", get(routes::servers::servers))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_window_params_default_uses_latest_record() {
        let records = vec![Record::new("alice", "A01").with_timestamp_str("2025-06-18 21:00:00")];
        let window = WindowParams::default().resolve(&records).unwrap();

        assert_eq!(window.to, NaiveDate::from_ymd_opt(2025, 6, 18).unwrap());
        assert_eq!(window.days(), 7);
    }

    #[test]
    fn test_window_params_errors() {
        let bad = WindowParams {
            from: Some("last week".to_string()),
            to: None,
        };
        assert!(matches!(bad.resolve(&[]), Err(ApiError::BadRequest(_))));

        let reversed = WindowParams {
            from: Some("2025-06-20".to_string()),
            to: Some("2025-06-10".to_string()),
        };
        assert!(matches!(reversed.resolve(&[]), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_api_error_status() {
        let response = ApiError::NotFound("player zed".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::from(StorageError::InvalidPath("x".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
