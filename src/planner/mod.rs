//! Trip planning: request validation and the AI-or-catalog decision.
//!
//! A validated trip is first offered to the AI agent (when a backend is
//! configured). Any agent failure degrades to the static catalog, so planning
//! itself never fails once the request is valid.

pub mod catalog;
pub mod client;
pub mod form;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::agents::backend::AiBackend;
use crate::agents::itinerary::ItineraryAgent;
use crate::agents::{Agent, AgentError};
use crate::models::{
    ItineraryPlan, MoodError, MoodSet, SuggestionStyle, TimeOfDay, TravelTime,
};

/// Longest accepted departure or destination name, in characters.
pub const MAX_PLACE_LEN: usize = 100;

/// Trip parameters as submitted by a client. Every field is optional here so
/// that missing values surface as validation errors rather than parse errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub mood: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion_style: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single field-level validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All problems found in a trip request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed: {}", summarize(.details))]
pub struct ValidationError {
    pub details: Vec<FieldError>,
}

fn summarize(details: &[FieldError]) -> String {
    details
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A trip that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidTrip {
    pub departure: String,
    pub destination: String,
    pub departure_time: TimeOfDay,
    pub arrival_time: TimeOfDay,
    pub travel_time: TravelTime,
    pub moods: MoodSet,
    pub style: SuggestionStyle,
}

fn required_place(field: &str, value: Option<&str>, errors: &mut Vec<FieldError>) -> String {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        errors.push(FieldError::new(field, "is required"));
    } else if value.chars().count() > MAX_PLACE_LEN {
        errors.push(FieldError::new(
            field,
            format!("must be at most {} characters", MAX_PLACE_LEN),
        ));
    }
    value.to_string()
}

fn required_time(
    field: &str,
    value: Option<&str>,
    errors: &mut Vec<FieldError>,
) -> Option<TimeOfDay> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => {
            errors.push(FieldError::new(field, "is required"));
            None
        }
        Some(raw) => match TimeOfDay::parse(raw) {
            Ok(t) => Some(t),
            Err(e) => {
                errors.push(FieldError::new(field, e.to_string()));
                None
            }
        },
    }
}

impl TripRequest {
    /// Check every field and collect all problems.
    ///
    /// The suggestion style is the one field that is never rejected: an
    /// absent or unknown style becomes `balanced`.
    pub fn validate(&self) -> Result<ValidTrip, ValidationError> {
        let mut errors = Vec::new();

        let departure = required_place("departure", self.departure.as_deref(), &mut errors);
        let destination =
            required_place("destination", self.destination.as_deref(), &mut errors);
        let departure_time =
            required_time("departureTime", self.departure_time.as_deref(), &mut errors);
        let arrival_time = required_time("arrivalTime", self.arrival_time.as_deref(), &mut errors);

        let moods = match MoodSet::parse(self.mood.as_slice()) {
            Ok(set) => Some(set),
            Err(mood_errors) => {
                for e in mood_errors {
                    let message = match e {
                        MoodError::Empty => e.to_string(),
                        MoodError::Unknown(_) => format!(
                            "{}; expected one of relaxed, adventurous, cultural, foodie, \
                             shopping, photo, music",
                            e
                        ),
                    };
                    errors.push(FieldError::new("mood", message));
                }
                None
            }
        };

        let style = SuggestionStyle::parse_lenient(self.suggestion_style.as_deref());
        if let Some(raw) = self.suggestion_style.as_deref() {
            if SuggestionStyle::parse(raw).is_none() {
                warn!("Unrecognized suggestion style '{}', using {}", raw, style);
            }
        }

        match (departure_time, arrival_time, moods) {
            (Some(departure_time), Some(arrival_time), Some(moods)) if errors.is_empty() => {
                Ok(ValidTrip {
                    departure,
                    destination,
                    departure_time,
                    arrival_time,
                    travel_time: TravelTime::between(departure_time, arrival_time),
                    moods,
                    style,
                })
            }
            _ => Err(ValidationError { details: errors }),
        }
    }
}

/// Why the catalog was used instead of the AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    NotConfigured,
    BackendUnavailable,
    UnparseableResponse,
    Timeout,
    RateLimited,
    /// The planning server could not be reached (client side only)
    ServerUnreachable,
}

impl From<&AgentError> for FallbackReason {
    fn from(err: &AgentError) -> Self {
        match err {
            AgentError::NotConfigured(_) => FallbackReason::NotConfigured,
            AgentError::BackendUnavailable(_) => FallbackReason::BackendUnavailable,
            AgentError::ResponseParseError(_) => FallbackReason::UnparseableResponse,
            AgentError::Timeout(_) => FallbackReason::Timeout,
            AgentError::RateLimited => FallbackReason::RateLimited,
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FallbackReason::NotConfigured => "AI backend not configured",
            FallbackReason::BackendUnavailable => "AI backend unavailable",
            FallbackReason::UnparseableResponse => "AI response could not be parsed",
            FallbackReason::Timeout => "AI backend timed out",
            FallbackReason::RateLimited => "AI backend rate limited",
            FallbackReason::ServerUnreachable => "planning server unreachable",
        };
        f.write_str(s)
    }
}

/// Where a plan came from. Both shapes are equally valid results.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    Generated(ItineraryPlan),
    Fallback {
        plan: ItineraryPlan,
        reason: FallbackReason,
    },
}

impl PlanOutcome {
    pub fn plan(&self) -> &ItineraryPlan {
        match self {
            PlanOutcome::Generated(plan) => plan,
            PlanOutcome::Fallback { plan, .. } => plan,
        }
    }

    pub fn into_plan(self) -> ItineraryPlan {
        match self {
            PlanOutcome::Generated(plan) => plan,
            PlanOutcome::Fallback { plan, .. } => plan,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, PlanOutcome::Fallback { .. })
    }

    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match self {
            PlanOutcome::Generated(_) => None,
            PlanOutcome::Fallback { reason, .. } => Some(*reason),
        }
    }

    /// Wire tag: "ai" or "fallback".
    pub fn source(&self) -> &'static str {
        match self {
            PlanOutcome::Generated(_) => "ai",
            PlanOutcome::Fallback { .. } => "fallback",
        }
    }
}

/// Build the catalog plan for a trip.
pub fn fallback_plan(trip: &ValidTrip) -> ItineraryPlan {
    ItineraryPlan::new(
        &trip.departure,
        &trip.destination,
        trip.travel_time,
        trip.style,
        catalog::resolve_suggestions(&trip.moods, trip.style, &trip.travel_time),
    )
}

/// Runs the AI path once and falls back to the catalog on any failure.
pub struct Planner {
    agent: Option<ItineraryAgent>,
}

impl Planner {
    pub fn new(backend: Option<Arc<dyn AiBackend>>) -> Self {
        Self {
            agent: backend.map(ItineraryAgent::new),
        }
    }

    /// A planner that always uses the catalog.
    pub fn offline() -> Self {
        Self { agent: None }
    }

    pub fn backend_name(&self) -> Option<&'static str> {
        self.agent.as_ref().map(|a| a.backend_name())
    }

    pub async fn plan(&self, trip: &ValidTrip) -> PlanOutcome {
        let Some(agent) = &self.agent else {
            return PlanOutcome::Fallback {
                plan: fallback_plan(trip),
                reason: FallbackReason::NotConfigured,
            };
        };

        match agent.execute(trip.clone()).await {
            Ok(suggestions) => PlanOutcome::Generated(ItineraryPlan::new(
                &trip.departure,
                &trip.destination,
                trip.travel_time,
                trip.style,
                suggestions,
            )),
            Err(e) => {
                warn!("{} agent failed, using catalog fallback: {}", agent.name(), e);
                let reason = FallbackReason::from(&e);
                info!("Fallback reason: {}", reason);
                PlanOutcome::Fallback {
                    plan: fallback_plan(trip),
                    reason,
                }
            }
        }
    }
}
