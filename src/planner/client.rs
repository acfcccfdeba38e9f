//! HTTP client for a remote planning server.
//!
//! Mirrors what a browser front end does: submit the trip, normalize whatever
//! comes back, and if the server cannot be reached build the catalog plan
//! locally so the user still gets something to look at.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use super::{
    fallback_plan, FallbackReason, FieldError, PlanOutcome, TripRequest, ValidTrip,
    ValidationError,
};
use crate::models::{route_label, ItineraryPlan, Suggestion, SuggestionStyle, TravelTime};

pub const GENERATE_PATH: &str = "/api/generate-suggestions";

pub struct PlannerClient {
    client: reqwest::Client,
    base_url: String,
}

impl PlannerClient {
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Request a plan from the server.
    ///
    /// Only validation problems are errors. Network failures, non-2xx
    /// responses other than 400, and unreadable bodies all produce the local
    /// catalog plan tagged `ServerUnreachable`.
    pub async fn generate(&self, request: &TripRequest) -> Result<PlanOutcome, ValidationError> {
        let trip = request.validate()?;
        let url = format!("{}{}", self.base_url, GENERATE_PATH);

        debug!("POST {}", url);
        let response = match self.client.post(&url).json(request).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Planning server unreachable: {}", e);
                return Ok(offline(&trip));
            }
        };

        let status = response.status();
        let body: Option<Value> = response.json().await.ok();

        if status == reqwest::StatusCode::BAD_REQUEST {
            return Err(server_validation_error(body.as_ref()));
        }

        if !status.is_success() {
            warn!("Planning server returned {}", status);
            return Ok(offline(&trip));
        }

        match body.as_ref().and_then(|b| normalize_response(b, &trip)) {
            Some(outcome) => Ok(outcome),
            None => {
                warn!("Planning server response had an unexpected shape");
                Ok(offline(&trip))
            }
        }
    }
}

fn offline(trip: &ValidTrip) -> PlanOutcome {
    PlanOutcome::Fallback {
        plan: fallback_plan(trip),
        reason: FallbackReason::ServerUnreachable,
    }
}

fn server_validation_error(body: Option<&Value>) -> ValidationError {
    let details: Vec<FieldError> = body
        .and_then(|b| b.get("details"))
        .and_then(|d| serde_json::from_value(d.clone()).ok())
        .unwrap_or_default();

    if !details.is_empty() {
        return ValidationError { details };
    }

    let message = body
        .and_then(|b| b.get("error"))
        .and_then(Value::as_str)
        .unwrap_or("rejected by server")
        .to_string();
    ValidationError {
        details: vec![FieldError::new("request", message)],
    }
}

/// Turn a success envelope into a plan, filling gaps from the local trip.
///
/// Returns `None` unless the body is `{success: true, data: {suggestions: [..]}}`.
pub fn normalize_response(body: &Value, trip: &ValidTrip) -> Option<PlanOutcome> {
    if body.get("success").and_then(Value::as_bool) != Some(true) {
        return None;
    }
    let data = body.get("data")?;
    let items = data.get("suggestions")?.as_array()?;

    let suggestions: Vec<Suggestion> = items
        .iter()
        .enumerate()
        .map(|(i, item)| Suggestion::from_loose(item, i))
        .collect();

    let route = data
        .get("route")
        .and_then(Value::as_str)
        .filter(|r| !r.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| route_label(&trip.departure, &trip.destination));

    let style = data
        .get("style")
        .and_then(Value::as_str)
        .and_then(SuggestionStyle::parse)
        .unwrap_or(trip.style);

    let travel_time = data
        .get("travelTime")
        .and_then(|t| serde_json::from_value::<TravelTime>(t.clone()).ok())
        .unwrap_or(trip.travel_time);

    let plan = ItineraryPlan {
        travel_time,
        route,
        style,
        suggestions,
    };

    let outcome = match body.get("source").and_then(Value::as_str) {
        Some("fallback") => PlanOutcome::Fallback {
            plan,
            reason: body
                .get("fallbackReason")
                .and_then(|r| serde_json::from_value(r.clone()).ok())
                .unwrap_or(FallbackReason::BackendUnavailable),
        },
        _ => PlanOutcome::Generated(plan),
    };
    Some(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> TripRequest {
        TripRequest {
            departure: Some("Kyoto".to_string()),
            destination: Some("Osaka".to_string()),
            departure_time: Some("22:30".to_string()),
            arrival_time: Some("01:00".to_string()),
            mood: vec!["music".to_string(), "foodie".to_string()],
            suggestion_style: Some("creative".to_string()),
        }
    }

    #[test]
    fn test_normalize_fills_missing_fields() {
        let trip = request().validate().unwrap();
        let body = json!({
            "success": true,
            "data": {"suggestions": [{"name": 42}, {}]}
        });

        let outcome = normalize_response(&body, &trip).unwrap();
        assert!(!outcome.is_fallback());
        let plan = outcome.plan();
        assert_eq!(plan.route, "Kyoto → Osaka");
        assert_eq!(plan.style, SuggestionStyle::Creative);
        assert_eq!(plan.travel_time.total_minutes, 150);
        assert_eq!(plan.suggestions[0].name, "42");
        assert_eq!(plan.suggestions[1].name, "Suggestion 2");
    }

    #[test]
    fn test_normalize_reads_fallback_tag() {
        let trip = request().validate().unwrap();
        let body = json!({
            "success": true,
            "source": "fallback",
            "fallbackReason": "timeout",
            "data": {"route": "X → Y", "style": "safe", "suggestions": []}
        });

        let outcome = normalize_response(&body, &trip).unwrap();
        assert_eq!(outcome.fallback_reason(), Some(FallbackReason::Timeout));
        assert_eq!(outcome.plan().route, "X → Y");
        assert_eq!(outcome.plan().style, SuggestionStyle::Safe);
    }

    #[test]
    fn test_normalize_rejects_bad_shapes() {
        let trip = request().validate().unwrap();
        assert!(normalize_response(&json!({"success": false}), &trip).is_none());
        assert!(normalize_response(&json!({"success": true}), &trip).is_none());
        assert!(
            normalize_response(&json!({"success": true, "data": {"suggestions": "x"}}), &trip)
                .is_none()
        );
    }

    #[test]
    fn test_server_validation_error_uses_details() {
        let body = json!({
            "success": false,
            "error": "Validation failed",
            "details": [{"field": "mood", "message": "at least one mood must be selected"}]
        });
        let err = server_validation_error(Some(&body));
        assert_eq!(err.details[0].field, "mood");

        let err = server_validation_error(None);
        assert_eq!(err.details[0].field, "request");
    }

    #[tokio::test]
    async fn test_local_validation_happens_before_network() {
        let client = PlannerClient::new("http://127.0.0.1:9", 1).unwrap();
        let err = client.generate(&TripRequest::default()).await.unwrap_err();
        assert!(!err.details.is_empty());
    }

    #[test]
    fn test_unreachable_server_falls_back_locally() {
        let client = PlannerClient::new("http://127.0.0.1:9", 2).unwrap();
        let outcome = tokio_test::block_on(client.generate(&request())).unwrap();

        assert_eq!(outcome.fallback_reason(), Some(FallbackReason::ServerUnreachable));
        let names: Vec<&str> = outcome
            .plan()
            .suggestions
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Standing bar off the map", "Street performance spot"]);
    }
}
