//! REST API endpoints.
//!
//! Axum-based HTTP API exposing the itinerary planner. Every error leaves
//! the server as `{success: false, error, details?}`.

pub mod rate_limit;
pub mod routes;
pub mod state;

use std::any::Any;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any as AnyOrigin, CorsLayer};
use tracing::{error, warn};

use crate::config::ServerConfig;
use crate::planner::{FieldError, ValidationError};
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(#[from] ValidationError),

    #[error("Invalid request body: {0}")]
    BadRequest(String),

    #[error("Too many requests, please try again later.")]
    RateLimited { retry_after_secs: u64 },

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let mut body = ErrorResponse::new(self.to_string());
        match self {
            ApiError::Validation(e) => body.details = Some(e.details),
            ApiError::RateLimited { retry_after_secs } => {
                let mut response = (status, Json(body)).into_response();
                if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                    response.headers_mut().insert(header::RETRY_AFTER, value);
                }
                return response;
            }
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}

/// Assemble the application router.
///
/// `/api` routes sit behind the rate limiter. CORS follows the configured
/// origins, and panics in handlers become 500 responses.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/generate-suggestions",
            post(routes::suggestions::generate_suggestions),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::enforce,
        ));

    let cors = cors_layer(&state.server);
    let expose_panics = !state.server.environment.is_production();

    Router::new()
        .route("/", get(routes::health::index))
        .route("/health", get(routes::health::health))
        .nest("/api", api)
        .fallback(not_found)
        .layer(cors)
        .layer(CatchPanicLayer::custom(move |err: Box<dyn Any + Send + 'static>| {
            panic_response(err, expose_panics)
        }))
        .with_state(state)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if server.allows_any_origin() {
        return base.allow_origin(AnyOrigin);
    }

    let allowed: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Skipping invalid CORS origin '{}'", o);
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(allowed))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("route".to_string())
}

fn panic_response(err: Box<dyn Any + Send + 'static>, expose: bool) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("Handler panicked: {}", detail);

    let message = if expose {
        detail
    } else {
        "Something went wrong!".to_string()
    };
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(message)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_envelope() {
        let err = ApiError::from(ValidationError {
            details: vec![FieldError::new("mood", "at least one mood must be selected")],
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Validation failed");
        assert_eq!(json["details"][0]["field"], "mood");
    }

    #[tokio::test]
    async fn test_rate_limited_sets_retry_after() {
        let response = ApiError::RateLimited {
            retry_after_secs: 42,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "42");

        let json = body_json(response).await;
        assert!(json.get("details").is_none());
    }

    async fn preflight(server: ServerConfig, origin: &str) -> Response {
        use tower::util::ServiceExt;

        let request = axum::http::Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/generate-suggestions")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(axum::body::Body::empty())
            .unwrap();

        Router::new()
            .route("/api/generate-suggestions", post(|| async {}))
            .layer(cors_layer(&server))
            .oneshot(request)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_cors_wildcard_and_list() {
        let response = preflight(ServerConfig::default(), "https://anywhere.example").await;
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let server = ServerConfig {
            cors_origins: vec!["https://app.example".to_string()],
            ..ServerConfig::default()
        };
        let allowed = preflight(server.clone(), "https://app.example").await;
        assert_eq!(
            allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://app.example"
        );

        let denied = preflight(server, "https://evil.example").await;
        assert!(denied
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_panic_response_hides_detail_in_production() {
        let hidden = panic_response(Box::new("db exploded"), false);
        assert_eq!(hidden.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(hidden).await["error"], "Something went wrong!");

        let shown = panic_response(Box::new("db exploded".to_string()), true);
        assert_eq!(body_json(shown).await["error"], "db exploded");
    }
}
