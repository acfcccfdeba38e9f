//! Itinerary suggestion cards and the plan wire format.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{SuggestionStyle, TravelTime};

pub const DEFAULT_SUGGESTION_TYPE: &str = "AI suggestion";
pub const DEFAULT_SUGGESTION_DURATION: &str = "60 min";
pub const DEFAULT_SUGGESTION_DESCRIPTION: &str = "No details provided.";

/// A geographic coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        let valid = (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng);
        valid.then_some(Self { lat, lng })
    }
}

/// One itinerary card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Category label (e.g. "Cafe", "Museum")
    #[serde(rename = "type")]
    pub kind: String,

    pub name: String,

    /// Free-form duration label (e.g. "45 min")
    pub duration: String,

    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
}

impl Suggestion {
    pub fn new(
        kind: impl Into<String>,
        name: impl Into<String>,
        duration: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            duration: duration.into(),
            description: description.into(),
            address: None,
            coordinates: None,
            tips: None,
        }
    }

    pub fn with_tips(mut self, tips: impl Into<String>) -> Self {
        self.tips = Some(tips.into());
        self
    }

    /// Coerce an untrusted JSON value into a suggestion.
    ///
    /// Every required field gets a default when missing, null, empty or of
    /// the wrong type; `index` is zero-based and only used for the default name.
    pub fn from_loose(value: &Value, index: usize) -> Self {
        let field = |key: &str| value.get(key).and_then(loose_string);

        Self {
            kind: field("type").unwrap_or_else(|| DEFAULT_SUGGESTION_TYPE.to_string()),
            name: field("name").unwrap_or_else(|| format!("Suggestion {}", index + 1)),
            duration: field("duration")
                .map(|d| normalize_duration_label(&d))
                .unwrap_or_else(|| DEFAULT_SUGGESTION_DURATION.to_string()),
            description: field("description")
                .unwrap_or_else(|| DEFAULT_SUGGESTION_DESCRIPTION.to_string()),
            address: field("address"),
            coordinates: value.get("coordinates").and_then(loose_coordinates),
            tips: value.get("tips").and_then(loose_tips),
        }
    }
}

/// A bare number of minutes becomes "N min"; anything else is kept verbatim.
fn normalize_duration_label(raw: &str) -> String {
    match raw.parse::<u32>() {
        Ok(minutes) => format!("{} min", minutes),
        Err(_) => raw.to_string(),
    }
}

fn loose_string(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

fn loose_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn loose_coordinates(value: &Value) -> Option<Coordinates> {
    let lat = value.get("lat").and_then(loose_f64)?;
    let lng = value
        .get("lng")
        .or_else(|| value.get("lon"))
        .and_then(loose_f64)?;
    Coordinates::new(lat, lng)
}

fn loose_tips(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(loose_string).collect();
            (!parts.is_empty()).then(|| parts.join(" / "))
        }
        other => loose_string(other),
    }
}

/// The payload rendered by clients: route summary plus suggestion cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryPlan {
    pub travel_time: TravelTime,
    pub route: String,
    pub style: SuggestionStyle,
    pub suggestions: Vec<Suggestion>,
}

impl ItineraryPlan {
    pub fn new(
        departure: &str,
        destination: &str,
        travel_time: TravelTime,
        style: SuggestionStyle,
        suggestions: Vec<Suggestion>,
    ) -> Self {
        Self {
            travel_time,
            route: route_label(departure, destination),
            style,
            suggestions,
        }
    }
}

pub fn route_label(departure: &str, destination: &str) -> String {
    format!("{} → {}", departure.trim(), destination.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_from_loose_fills_every_default() {
        let s = Suggestion::from_loose(&json!({}), 2);
        assert_eq!(s.kind, DEFAULT_SUGGESTION_TYPE);
        assert_eq!(s.name, "Suggestion 3");
        assert_eq!(s.duration, DEFAULT_SUGGESTION_DURATION);
        assert_eq!(s.description, DEFAULT_SUGGESTION_DESCRIPTION);
        assert!(s.address.is_none());
        assert!(s.coordinates.is_none());
        assert!(s.tips.is_none());
    }

    #[test]
    fn test_from_loose_coerces_types() {
        let value = json!({
            "type": "Cafe",
            "name": "  Harbour Roastery ",
            "duration": 45,
            "description": null,
            "address": "",
            "coordinates": {"lat": "35.44", "lng": 139.64},
            "tips": ["Sit by the window", 2, null]
        });

        let s = Suggestion::from_loose(&value, 0);
        assert_eq!(s.name, "Harbour Roastery");
        assert_eq!(s.duration, "45 min");
        assert_eq!(s.description, DEFAULT_SUGGESTION_DESCRIPTION);
        assert!(s.address.is_none());
        assert_eq!(s.coordinates, Some(Coordinates { lat: 35.44, lng: 139.64 }));
        assert_eq!(s.tips.as_deref(), Some("Sit by the window / 2"));
    }

    #[test]
    fn test_from_loose_drops_out_of_range_coordinates() {
        let s = Suggestion::from_loose(&json!({"coordinates": {"lat": 120, "lng": 10}}), 0);
        assert!(s.coordinates.is_none());
    }

    #[test]
    fn test_suggestion_wire_shape() {
        let s = Suggestion::new("Park", "Riverside Walk", "30 min", "A quiet stroll.");
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(
            json,
            json!({
                "type": "Park",
                "name": "Riverside Walk",
                "duration": "30 min",
                "description": "A quiet stroll."
            })
        );
    }

    #[test]
    fn test_plan_wire_shape() {
        let plan = ItineraryPlan::new(
            "Tokyo Station",
            "Yokohama Station",
            TravelTime::from_total_minutes(90),
            SuggestionStyle::Safe,
            vec![],
        );
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["route"], "Tokyo Station → Yokohama Station");
        assert_eq!(json["style"], "safe");
        assert_eq!(json["travelTime"]["totalMinutes"], 90);
    }
}
