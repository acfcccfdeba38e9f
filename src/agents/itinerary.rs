//! Itinerary Agent.
//!
//! Asks the model for stop-over suggestions that fit a trip's route, time
//! window, moods and style.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::backend::{AiBackend, ChatMessage, ChatRequest};
use super::{Agent, AgentError};
use crate::models::Suggestion;
use crate::planner::ValidTrip;

/// Cap on suggestions accepted from a single reply.
pub const MAX_SUGGESTIONS: usize = 6;

const MAX_OUTPUT_TOKENS: u32 = 2048;

/// Itinerary agent implementation.
pub struct ItineraryAgent {
    backend: Arc<dyn AiBackend>,
}

impl ItineraryAgent {
    pub fn new(backend: Arc<dyn AiBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    fn build_prompt(&self, trip: &ValidTrip) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(format!(
                "{}\n\nStyle guidance:\n{}",
                ITINERARY_SYSTEM_PROMPT,
                trip.style.instructions()
            )),
            ChatMessage::user(trip_description(trip)),
        ]
    }

    fn parse_response(&self, response: &str) -> Result<Vec<Suggestion>, AgentError> {
        let json = super::extract_json(response);
        let parsed: Value = serde_json::from_str(json).map_err(|e| {
            warn!(
                "Itinerary JSON parse error. Response start: {}",
                response.chars().take(200).collect::<String>()
            );
            AgentError::ResponseParseError(format!("Invalid JSON: {}", e))
        })?;

        let items = parsed
            .get("suggestions")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                AgentError::ResponseParseError("missing 'suggestions' array".to_string())
            })?;

        let suggestions: Vec<Suggestion> = items
            .iter()
            .filter(|item| item.is_object())
            .take(MAX_SUGGESTIONS)
            .enumerate()
            .map(|(i, item)| Suggestion::from_loose(item, i))
            .collect();

        if suggestions.is_empty() {
            return Err(AgentError::ResponseParseError(
                "reply contained no suggestions".to_string(),
            ));
        }

        Ok(suggestions)
    }
}

fn trip_description(trip: &ValidTrip) -> String {
    let moods: Vec<&str> = trip.moods.iter().map(|m| m.describe()).collect();
    format!(
        "Departure: {}\nDestination: {}\nDeparture time: {}\nArrival time: {}\n\
         Available time: {} ({} minutes)\nThe traveller {}.\nSuggestion style: {}",
        trip.departure,
        trip.destination,
        trip.departure_time,
        trip.arrival_time,
        trip.travel_time,
        trip.travel_time.total_minutes,
        moods.join(", and "),
        trip.style.label(),
    )
}

const ITINERARY_SYSTEM_PROMPT: &str = r#"You are a travel planner suggesting stops between a departure point and a destination.

Given the route, the time window and the traveller's mood, suggest 3 to 5 places to visit on the way.
The total time of all stops must fit inside the available time, leaving room for travel.

Return JSON in this exact format:
{
  "suggestions": [
    {
      "type": "Cafe",
      "name": "Exact place name",
      "duration": "45 min",
      "description": "One or two sentences on why it fits the traveller's mood",
      "address": "Street address if known",
      "coordinates": {"lat": 35.4437, "lng": 139.6380},
      "tips": "One practical tip"
    }
  ]
}

IMPORTANT:
- Only suggest places that plausibly exist along or near the route
- Omit address and coordinates rather than inventing them
- Keep every string short enough to fit on a small card
- Respond with the JSON object only"#;

#[async_trait]
impl Agent for ItineraryAgent {
    type Input = ValidTrip;
    type Output = Vec<Suggestion>;

    fn name(&self) -> &'static str {
        "itinerary"
    }

    async fn execute(&self, input: Self::Input) -> Result<Self::Output, AgentError> {
        info!(
            "Running Itinerary agent for {} → {} via {}",
            input.departure,
            input.destination,
            self.backend.name()
        );

        let request = ChatRequest::new(self.build_prompt(&input))
            .with_json_mode()
            .with_temperature(input.style.temperature())
            .with_max_tokens(MAX_OUTPUT_TOKENS);

        let response = self.backend.chat(request).await?;
        debug!("AI response from {}: {}", response.model, response.content);
        if let Some(usage) = &response.tokens_used {
            debug!(
                "Tokens used: {} prompt + {} completion = {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        let suggestions = self.parse_response(&response.content)?;

        info!("Itinerary agent produced {} suggestions", suggestions.len());

        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::backend::MockBackend;
    use crate::models::{MoodSet, SuggestionStyle, TimeOfDay, TravelTime};

    fn trip(style: SuggestionStyle) -> ValidTrip {
        let departure_time = TimeOfDay::parse("10:00").unwrap();
        let arrival_time = TimeOfDay::parse("13:30").unwrap();
        ValidTrip {
            departure: "Tokyo Station".to_string(),
            destination: "Yokohama Station".to_string(),
            departure_time,
            arrival_time,
            travel_time: TravelTime::between(departure_time, arrival_time),
            moods: MoodSet::parse(&["foodie", "relaxed"]).unwrap(),
            style,
        }
    }

    fn mock_response() -> &'static str {
        r#"```json
        {
            "suggestions": [
                {
                    "type": "Cafe",
                    "name": "Harbour Roastery",
                    "duration": "45 min",
                    "description": "Slow coffee by the water.",
                    "coordinates": {"lat": 35.45, "lng": 139.64}
                },
                "not an object",
                {
                    "name": "Chinatown food walk",
                    "duration": 60
                }
            ]
        }
        ```"#
    }

    #[tokio::test]
    async fn test_itinerary_extraction() {
        let backend = Arc::new(MockBackend::new(mock_response()));
        let agent = ItineraryAgent::new(backend);

        let suggestions = agent.execute(trip(SuggestionStyle::Balanced)).await.unwrap();

        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].name, "Harbour Roastery");
        assert!(suggestions[0].coordinates.is_some());
        assert_eq!(suggestions[1].kind, crate::models::DEFAULT_SUGGESTION_TYPE);
        assert_eq!(suggestions[1].duration, "60 min");
    }

    #[tokio::test]
    async fn test_request_carries_style_and_trip() {
        let backend = Arc::new(MockBackend::new(mock_response()));
        let agent = ItineraryAgent::new(backend.clone());

        agent.execute(trip(SuggestionStyle::Creative)).await.unwrap();

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert!(request.json_mode);
        assert_eq!(request.temperature, Some(1.0));
        assert!(request.messages[0]
            .content
            .contains(SuggestionStyle::Creative.instructions()));
        let user = &request.messages[1].content;
        assert!(user.contains("Tokyo Station"));
        assert!(user.contains("210 minutes"));
        assert!(user.contains("wants to relax, and is in the mood for good food"));
    }

    #[tokio::test]
    async fn test_empty_suggestions_is_an_error() {
        let backend = Arc::new(MockBackend::new(r#"{"suggestions": []}"#));
        let agent = ItineraryAgent::new(backend);

        let err = agent.execute(trip(SuggestionStyle::Safe)).await.unwrap_err();
        assert!(matches!(err, AgentError::ResponseParseError(_)));
    }

    #[tokio::test]
    async fn test_non_json_reply_is_an_error() {
        let backend = Arc::new(MockBackend::new("I cannot help with that."));
        let agent = ItineraryAgent::new(backend);

        let err = agent.execute(trip(SuggestionStyle::Safe)).await.unwrap_err();
        assert!(matches!(err, AgentError::ResponseParseError(_)));
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let backend = Arc::new(MockBackend::failing("connection refused"));
        let agent = ItineraryAgent::new(backend);

        let err = agent.execute(trip(SuggestionStyle::Safe)).await.unwrap_err();
        assert!(matches!(err, AgentError::BackendUnavailable(_)));
    }

    #[test]
    fn test_agent_name() {
        let backend: Arc<dyn AiBackend> = Arc::new(MockBackend::new("{}"));
        let agent = ItineraryAgent::new(backend);
        assert_eq!(agent.name(), "itinerary");
        assert_eq!(agent.backend_name(), "mock");
    }
}
