//! Mood tags and suggestion styles.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A user-selected trip feel.
///
/// Declaration order is the priority order used when building suggestion
/// lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Relaxed,
    Adventurous,
    Cultural,
    Foodie,
    Shopping,
    Photo,
    Music,
}

impl Mood {
    pub const ALL: [Mood; 7] = [
        Mood::Relaxed,
        Mood::Adventurous,
        Mood::Cultural,
        Mood::Foodie,
        Mood::Shopping,
        Mood::Photo,
        Mood::Music,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Relaxed => "relaxed",
            Mood::Adventurous => "adventurous",
            Mood::Cultural => "cultural",
            Mood::Foodie => "foodie",
            Mood::Shopping => "shopping",
            Mood::Photo => "photo",
            Mood::Music => "music",
        }
    }

    /// Human-readable phrase used in AI prompts.
    pub fn describe(&self) -> &'static str {
        match self {
            Mood::Relaxed => "wants to relax",
            Mood::Adventurous => "feels adventurous",
            Mood::Cultural => "wants a cultural experience",
            Mood::Foodie => "is in the mood for good food",
            Mood::Shopping => "wants to go shopping",
            Mood::Photo => "wants to take photos",
            Mood::Music => "wants to enjoy music",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoodError {
    #[error("unknown mood '{0}'")]
    Unknown(String),

    #[error("at least one mood must be selected")]
    Empty,
}

impl FromStr for Mood {
    type Err = MoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| MoodError::Unknown(s.to_string()))
    }
}

/// A non-empty set of moods, iterated in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Mood>", into = "Vec<Mood>")]
pub struct MoodSet(BTreeSet<Mood>);

impl MoodSet {
    pub fn new(moods: impl IntoIterator<Item = Mood>) -> Result<Self, MoodError> {
        let set: BTreeSet<Mood> = moods.into_iter().collect();
        if set.is_empty() {
            return Err(MoodError::Empty);
        }
        Ok(Self(set))
    }

    /// Parse raw tags. Every unknown tag is reported, not just the first.
    pub fn parse<S: AsRef<str>>(tags: &[S]) -> Result<Self, Vec<MoodError>> {
        let mut moods = BTreeSet::new();
        let mut errors = Vec::new();

        for tag in tags {
            match tag.as_ref().parse::<Mood>() {
                Ok(mood) => {
                    moods.insert(mood);
                }
                Err(e) => errors.push(e),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Self::new(moods).map_err(|e| vec![e])
    }

    pub fn contains(&self, mood: Mood) -> bool {
        self.0.contains(&mood)
    }

    pub fn iter(&self) -> impl Iterator<Item = Mood> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<Mood>> for MoodSet {
    type Error = MoodError;

    fn try_from(moods: Vec<Mood>) -> Result<Self, Self::Error> {
        Self::new(moods)
    }
}

impl From<MoodSet> for Vec<Mood> {
    fn from(set: MoodSet) -> Self {
        set.0.into_iter().collect()
    }
}

/// How conventional or novel the suggestions should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStyle {
    /// Well-known, dependable spots
    Safe,
    /// A mix of classics and a few surprises
    #[default]
    Balanced,
    /// Hidden, unexpected experiences
    Creative,
}

impl SuggestionStyle {
    pub const ALL: [SuggestionStyle; 3] = [
        SuggestionStyle::Safe,
        SuggestionStyle::Balanced,
        SuggestionStyle::Creative,
    ];

    /// Parse a style, returning `None` for anything outside the vocabulary.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Parse a style, defaulting to `Balanced` when absent or unrecognized.
    pub fn parse_lenient(s: Option<&str>) -> Self {
        s.and_then(Self::parse).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionStyle::Safe => "safe",
            SuggestionStyle::Balanced => "balanced",
            SuggestionStyle::Creative => "creative",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SuggestionStyle::Safe => "Classic & reliable",
            SuggestionStyle::Balanced => "Balanced",
            SuggestionStyle::Creative => "Adventurous & unique",
        }
    }

    /// Sampling temperature for the AI backend.
    pub fn temperature(&self) -> f32 {
        match self {
            SuggestionStyle::Safe => 0.3,
            SuggestionStyle::Balanced => 0.7,
            SuggestionStyle::Creative => 1.0,
        }
    }

    /// Style-specific instruction block appended to the AI prompt.
    pub fn instructions(&self) -> &'static str {
        match self {
            SuggestionStyle::Safe => {
                "Suggest only well-established, highly rated places that first-time visitors \
                 can rely on. Prefer famous landmarks, chain-quality service and easy access. \
                 Avoid anything experimental or hard to find."
            }
            SuggestionStyle::Balanced => {
                "Mix dependable classics with one or two lesser-known spots. Keep every \
                 suggestion practical for the available time."
            }
            SuggestionStyle::Creative => {
                "Favour hidden gems, local secrets and unexpected experiences that most \
                 travellers would miss. Surprise the traveller, but keep each stop feasible \
                 within the available time."
            }
        }
    }
}

impl fmt::Display for SuggestionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_set_iterates_in_priority_order() {
        let set = MoodSet::parse(&["music", "cultural", "relaxed", "cultural"]).unwrap();
        let order: Vec<Mood> = set.iter().collect();
        assert_eq!(order, vec![Mood::Relaxed, Mood::Cultural, Mood::Music]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_mood_parse_is_case_insensitive() {
        assert_eq!("Foodie".parse::<Mood>().unwrap(), Mood::Foodie);
    }

    #[test]
    fn test_mood_set_rejects_unknown_and_empty() {
        let errs = MoodSet::parse(&["relaxed", "sleepy", "bored"]).unwrap_err();
        assert_eq!(errs.len(), 2);

        let empty: [&str; 0] = [];
        assert_eq!(MoodSet::parse(&empty).unwrap_err(), vec![MoodError::Empty]);
    }

    #[test]
    fn test_mood_set_serde_rejects_empty() {
        assert!(serde_json::from_str::<MoodSet>("[]").is_err());
        let set: MoodSet = serde_json::from_str(r#"["photo","foodie"]"#).unwrap();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["foodie","photo"]"#);
    }

    #[test]
    fn test_style_lenient_defaults_to_balanced() {
        assert_eq!(SuggestionStyle::parse_lenient(None), SuggestionStyle::Balanced);
        assert_eq!(SuggestionStyle::parse_lenient(Some("wild")), SuggestionStyle::Balanced);
        assert_eq!(SuggestionStyle::parse_lenient(Some("SAFE")), SuggestionStyle::Safe);
        assert_eq!(SuggestionStyle::parse_lenient(Some("creative")), SuggestionStyle::Creative);
    }

    #[test]
    fn test_style_temperature_increases_with_novelty() {
        assert!(SuggestionStyle::Safe.temperature() < SuggestionStyle::Balanced.temperature());
        assert!(SuggestionStyle::Balanced.temperature() < SuggestionStyle::Creative.temperature());
    }
}
