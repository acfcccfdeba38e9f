use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::ItineraryPlan;
use crate::planner::{FallbackReason, PlanOutcome, TripRequest};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsResponse {
    pub success: bool,
    pub data: ItineraryPlan,
    pub source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<FallbackReason>,
}

impl From<PlanOutcome> for SuggestionsResponse {
    fn from(outcome: PlanOutcome) -> Self {
        let source = outcome.source();
        let fallback_reason = outcome.fallback_reason();
        Self {
            success: true,
            data: outcome.into_plan(),
            source,
            fallback_reason,
        }
    }
}

/// POST /api/generate-suggestions
///
/// Always answers 200 for a valid trip; AI failures show up as
/// `source: "fallback"` with a reason rather than as an error status.
pub async fn generate_suggestions(
    State(state): State<AppState>,
    payload: Result<Json<TripRequest>, JsonRejection>,
) -> Result<Json<SuggestionsResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let trip = request.validate()?;

    info!(
        "Planning {} -> {} ({} min, {} moods, {})",
        trip.departure,
        trip.destination,
        trip.travel_time.total_minutes,
        trip.moods.len(),
        trip.style.as_str()
    );

    let outcome = state.planner.plan(&trip).await;
    Ok(Json(SuggestionsResponse::from(outcome)))
}
