//! Planner form state.
//!
//! The form is an explicit value: every user action is a `FormEvent` and
//! `reduce` returns the next state without touching anything else.

use super::{FallbackReason, PlanOutcome, TripRequest};
use crate::models::{compute_duration, ItineraryPlan, Mood, SuggestionStyle, TravelTime};

/// Text inputs on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Departure,
    Destination,
    DepartureTime,
    ArrivalTime,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    FieldChanged(FormField, String),
    MoodToggled(Mood),
    StyleSelected(SuggestionStyle),
    SubmitStarted,
    SubmitSucceeded(PlanOutcome),
    /// The request failed outright; the message is shown and the plan (if
    /// any) is the locally built fallback.
    SubmitFailed {
        message: String,
        fallback: Option<ItineraryPlan>,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub departure: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    /// Selected moods in the order the user picked them
    pub moods: Vec<Mood>,
    pub style: SuggestionStyle,
    pub plan: Option<ItineraryPlan>,
    /// Set when the current plan came from the catalog
    pub fallback_reason: Option<FallbackReason>,
    pub loading: bool,
    pub error: Option<String>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the submit button should be enabled.
    pub fn is_valid(&self) -> bool {
        !self.departure.trim().is_empty()
            && !self.destination.trim().is_empty()
            && !self.departure_time.trim().is_empty()
            && !self.arrival_time.trim().is_empty()
            && !self.moods.is_empty()
    }

    pub fn can_submit(&self) -> bool {
        self.is_valid() && !self.loading
    }

    /// Available time shown next to the inputs, if both times parse.
    pub fn travel_time(&self) -> Option<TravelTime> {
        compute_duration(Some(self.departure_time.as_str()), Some(self.arrival_time.as_str()))
            .ok()
            .flatten()
    }

    /// The request body this form would submit.
    pub fn to_request(&self) -> TripRequest {
        TripRequest {
            departure: Some(self.departure.clone()),
            destination: Some(self.destination.clone()),
            departure_time: Some(self.departure_time.clone()),
            arrival_time: Some(self.arrival_time.clone()),
            mood: self.moods.iter().map(|m| m.as_str().to_string()).collect(),
            suggestion_style: Some(self.style.as_str().to_string()),
        }
    }
}

/// Apply one event to the form.
pub fn reduce(mut state: FormState, event: FormEvent) -> FormState {
    match event {
        FormEvent::FieldChanged(field, value) => {
            match field {
                FormField::Departure => state.departure = value,
                FormField::Destination => state.destination = value,
                FormField::DepartureTime => state.departure_time = value,
                FormField::ArrivalTime => state.arrival_time = value,
            }
            state.error = None;
        }
        FormEvent::MoodToggled(mood) => {
            if let Some(pos) = state.moods.iter().position(|m| *m == mood) {
                state.moods.remove(pos);
            } else {
                state.moods.push(mood);
            }
            state.error = None;
        }
        FormEvent::StyleSelected(style) => {
            state.style = style;
            state.error = None;
        }
        FormEvent::SubmitStarted => {
            state.loading = true;
            state.error = None;
        }
        FormEvent::SubmitSucceeded(outcome) => {
            state.loading = false;
            state.fallback_reason = outcome.fallback_reason();
            state.plan = Some(outcome.into_plan());
        }
        FormEvent::SubmitFailed { message, fallback } => {
            state.loading = false;
            state.error = Some(message);
            state.fallback_reason = fallback.as_ref().map(|_| FallbackReason::ServerUnreachable);
            state.plan = fallback;
        }
    }
    state
}
