//! Static suggestion catalog used when the AI path is unavailable.
//!
//! Each mood has one entry per style. Safe entries point at well-known
//! places, creative entries at the unexpected; balanced sits in between.

use crate::models::{Mood, MoodSet, Suggestion, SuggestionStyle, TravelTime};

/// Trips of this length or shorter get the direct-route entry only.
pub const MIN_DETOUR_MINUTES: u16 = 60;

/// A row of the catalog.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub mood: Mood,
    pub style: SuggestionStyle,
    pub kind: &'static str,
    pub name: &'static str,
    pub duration: &'static str,
    pub description: &'static str,
    pub tips: Option<&'static str>,
}

impl CatalogEntry {
    pub fn to_suggestion(&self) -> Suggestion {
        let suggestion = Suggestion::new(self.kind, self.name, self.duration, self.description);
        match self.tips {
            Some(tips) => suggestion.with_tips(tips),
            None => suggestion,
        }
    }
}

const fn entry(
    mood: Mood,
    style: SuggestionStyle,
    kind: &'static str,
    name: &'static str,
    duration: &'static str,
    description: &'static str,
    tips: Option<&'static str>,
) -> CatalogEntry {
    CatalogEntry {
        mood,
        style,
        kind,
        name,
        duration,
        description,
        tips,
    }
}

use Mood::*;
use SuggestionStyle::{Balanced, Creative, Safe};

#[rustfmt::skip]
pub static CATALOG: &[CatalogEntry] = &[
    // relaxed
    entry(Relaxed, Safe, "Park", "Station-side park", "30 min",
        "Unwind on a bench in the well-kept park next to the station.", None),
    entry(Relaxed, Balanced, "Cafe", "Quiet neighbourhood cafe", "45 min",
        "Slow down with a drink at a calm cafe a short walk off the main road.",
        Some("Ask for a seat away from the counter.")),
    entry(Relaxed, Creative, "Spa", "Hidden footbath", "40 min",
        "Soak your feet at a little-known public footbath along the way.",
        Some("Bring a small towel.")),
    // adventurous
    entry(Adventurous, Safe, "Walk", "Riverside promenade", "40 min",
        "Follow the signposted river path for an easy change of scenery.", None),
    entry(Adventurous, Balanced, "Walk", "Backstreet shortcut", "50 min",
        "Swap the main road for a walk through the older side streets.", None),
    entry(Adventurous, Creative, "Explore", "Unmarked alley crawl", "60 min",
        "Pick a street you have never heard of and see where it leads.",
        Some("Keep an eye on the time and a map handy.")),
    // cultural
    entry(Cultural, Safe, "Museum", "City history museum", "60 min",
        "Get the classic overview of the area at the main history museum.",
        Some("Check closing times before you go.")),
    entry(Cultural, Balanced, "Shrine", "Local shrine and garden", "30 min",
        "Stop at a neighbourhood shrine with a small traditional garden.", None),
    entry(Cultural, Creative, "Workshop", "Craft workshop drop-in", "60 min",
        "Try a short hands-on session at an independent craft studio.",
        Some("Some studios ask for a same-day booking.")),
    // foodie
    entry(Foodie, Safe, "Restaurant", "Station food hall", "45 min",
        "Browse the popular food hall for dependable local favourites.", None),
    entry(Foodie, Balanced, "Market", "Morning market stalls", "45 min",
        "Graze on snacks at the local market, mixing staples and specials.", None),
    entry(Foodie, Creative, "Food", "Standing bar off the map", "40 min",
        "Find a tiny standing bar that only the regulars know about.",
        Some("Cash is often the only option.")),
    // shopping
    entry(Shopping, Safe, "Shopping", "Department store", "60 min",
        "Walk the floors of the main department store near the station.", None),
    entry(Shopping, Balanced, "Shopping", "Shopping arcade", "45 min",
        "Wander a covered arcade that mixes big names with family shops.", None),
    entry(Shopping, Creative, "Shopping", "Vintage and zine shops", "50 min",
        "Dig through second-hand and independent shops for one-off finds.", None),
    // photo
    entry(Photo, Safe, "Viewpoint", "Observation deck", "40 min",
        "Take the classic skyline shot from the best-known observation deck.", None),
    entry(Photo, Balanced, "Viewpoint", "Bridge at golden hour", "30 min",
        "Catch the light on the water from a bridge on your route.",
        Some("Arrive a little before sunset.")),
    entry(Photo, Creative, "Photo walk", "Street art and rooftops", "50 min",
        "Hunt down murals and unusual angles away from the usual photo spots.", None),
    // music
    entry(Music, Safe, "Music", "Record store listening booth", "30 min",
        "Listen to new releases at a large, well-stocked record store.", None),
    entry(Music, Balanced, "Music", "Jazz cafe", "60 min",
        "Relax with a coffee while a jazz playlist or live set plays.", None),
    entry(Music, Creative, "Music", "Street performance spot", "40 min",
        "Find where local buskers gather and catch an impromptu show.",
        Some("Weekends are busiest.")),
];

/// The single entry returned when there is no time for a detour.
pub fn direct_route() -> Suggestion {
    Suggestion::new(
        "Direct route",
        "Head straight to your destination",
        "0 min",
        "There is not enough time for a stop on this trip. Take the most direct route.",
    )
}

/// Look up the catalog row for a mood and style.
pub fn lookup(mood: Mood, style: SuggestionStyle) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|e| e.mood == mood && e.style == style)
}

/// Deterministically pick suggestions for a trip.
pub fn resolve_suggestions(
    moods: &MoodSet,
    style: SuggestionStyle,
    travel_time: &TravelTime,
) -> Vec<Suggestion> {
    if travel_time.total_minutes <= MIN_DETOUR_MINUTES {
        return vec![direct_route()];
    }

    moods
        .iter()
        .filter_map(|mood| lookup(mood, style))
        .map(CatalogEntry::to_suggestion)
        .collect()
}
