use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
    pub environment: &'static str,
    pub ai_backend: &'static str,
}

pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Hello from the Journey Planner backend!",
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "Journey Planner API is running",
        timestamp: Utc::now(),
        environment: state.server.environment.as_str(),
        ai_backend: state.ai_backend_name(),
    })
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::config::AppConfig;
    use crate::planner::Planner;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    fn app() -> axum::Router {
        build_router(AppState::new(Planner::offline(), &AppConfig::default()))
    }

    #[tokio::test]
    async fn test_index_banner() {
        let (status, json) = get_json(app(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["message"].as_str().unwrap().contains("Journey Planner"));
    }

    #[tokio::test]
    async fn test_health_reports_environment_and_backend() {
        let (status, json) = get_json(app(), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "OK");
        assert_eq!(json["environment"], "development");
        assert_eq!(json["aiBackend"], "catalog");
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_route_is_404_envelope() {
        let (status, json) = get_json(app(), "/api/nope").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().starts_with("Not found"));
    }
}
