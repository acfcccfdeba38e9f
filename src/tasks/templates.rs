//! Keyword-triggered task templates.
//!
//! Free text is matched against ordered keyword groups; the first group with
//! a hit picks the category whose canned templates are offered.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Inputs shorter than this (after trimming) get no suggestions.
pub const MIN_INPUT_LEN: usize = 3;

/// Most templates offered at once.
pub const MAX_TEMPLATES: usize = 3;

/// Pause before suggestions are shown while the user is still typing.
pub const DEFAULT_DISPLAY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateCategory {
    Work,
    Meeting,
    Shopping,
    Health,
    Study,
    Home,
    Default,
}

impl TemplateCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateCategory::Work => "work",
            TemplateCategory::Meeting => "meeting",
            TemplateCategory::Shopping => "shopping",
            TemplateCategory::Health => "health",
            TemplateCategory::Study => "study",
            TemplateCategory::Home => "home",
            TemplateCategory::Default => "default",
        }
    }

    pub fn templates(&self) -> &'static [&'static str] {
        match self {
            TemplateCategory::Work => &[
                "Prepare the report draft",
                "Reply to pending emails",
                "Update the project status",
                "Review this week's priorities",
            ],
            TemplateCategory::Meeting => &[
                "Send the agenda beforehand",
                "Book a meeting room",
                "Write up the minutes",
                "Follow up on action items",
            ],
            TemplateCategory::Shopping => &[
                "Check what is already at home",
                "Write a shopping list",
                "Compare prices online",
            ],
            TemplateCategory::Health => &[
                "Pack gym clothes",
                "Fill the water bottle",
                "Stretch for ten minutes",
                "Book the appointment",
            ],
            TemplateCategory::Study => &[
                "Set a 25-minute focus timer",
                "Summarize yesterday's notes",
                "Gather the reading material",
            ],
            TemplateCategory::Home => &[
                "Take out the rubbish",
                "Run the laundry",
                "Tidy the kitchen",
            ],
            TemplateCategory::Default => &[
                "Break it into smaller steps",
                "Set a deadline",
                "Add a reminder",
            ],
        }
    }
}

/// Keyword groups in match priority order.
///
/// Matching is by substring, so no keyword may contain one from an earlier
/// group ("workout" would land in work).
pub static KEYWORD_GROUPS: &[(TemplateCategory, &[&str])] = &[
    (TemplateCategory::Work, &["work", "job", "office", "project", "report"]),
    (TemplateCategory::Meeting, &["meeting", "call", "zoom", "interview"]),
    (TemplateCategory::Shopping, &["buy", "shop", "grocer", "store"]),
    (TemplateCategory::Health, &["gym", "exercise", "run", "doctor"]),
    (TemplateCategory::Study, &["study", "learn", "revise", "exam", "course"]),
    (TemplateCategory::Home, &["clean", "laundry", "cook", "dishes"]),
];

/// Pick the category for a piece of free text.
pub fn categorize(text: &str) -> TemplateCategory {
    let lowered = text.to_lowercase();
    KEYWORD_GROUPS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(TemplateCategory::Default)
}

/// Up to three templates for the given text, or none for very short input.
pub fn match_templates(text: &str) -> Vec<&'static str> {
    let trimmed = text.trim();
    if trimmed.chars().count() < MIN_INPUT_LEN {
        return Vec::new();
    }

    categorize(trimmed)
        .templates()
        .iter()
        .take(MAX_TEMPLATES)
        .copied()
        .collect()
}

/// Delays template suggestions until input settles.
///
/// Each call to `settle` registers a new input generation. After the delay,
/// only the newest generation yields results; superseded calls get `None`.
#[derive(Debug)]
pub struct TemplateDebouncer {
    delay: Duration,
    generation: AtomicU64,
}

impl Default for TemplateDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_DELAY)
    }
}

impl TemplateDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: AtomicU64::new(0),
        }
    }

    pub async fn settle(&self, text: &str) -> Option<Vec<&'static str>> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;

        if self.generation.load(Ordering::SeqCst) != ticket {
            return None;
        }
        Some(match_templates(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_group_wins() {
        assert_eq!(
            match_templates("schedule a work meeting"),
            vec![
                "Prepare the report draft",
                "Reply to pending emails",
                "Update the project status"
            ]
        );
    }

    #[test]
    fn test_short_input_is_empty() {
        assert!(match_templates("ab").is_empty());
        assert!(match_templates("   ab   ").is_empty());
        assert!(!match_templates("abc").is_empty());
    }

    #[test]
    fn test_match_is_case_insensitive() {
        assert_eq!(categorize("Zoom CALL with Sam"), TemplateCategory::Meeting);
        assert_eq!(categorize("BUY GROCERIES"), TemplateCategory::Shopping);
    }

    #[test]
    fn test_no_keyword_uses_default() {
        assert_eq!(categorize("water the plants"), TemplateCategory::Default);
        assert_eq!(
            match_templates("water the plants"),
            TemplateCategory::Default.templates().to_vec()
        );
    }

    #[test]
    fn test_every_keyword_reaches_its_group() {
        for (category, keywords) in KEYWORD_GROUPS {
            for keyword in *keywords {
                assert_eq!(categorize(keyword), *category, "keyword '{}'", keyword);
            }
        }
        assert_eq!(categorize("morning run"), TemplateCategory::Health);
    }

    #[test]
    fn test_never_more_than_three() {
        for (category, _) in KEYWORD_GROUPS {
            assert!(category.templates().len() >= MAX_TEMPLATES);
        }
        assert_eq!(match_templates("gym session").len(), MAX_TEMPLATES);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_returns_latest_input() {
        let debouncer = TemplateDebouncer::new(Duration::from_millis(20));
        let result = debouncer.settle("clean the flat").await;
        assert_eq!(result, Some(TemplateCategory::Home.templates().to_vec()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_drops_superseded_input() {
        let debouncer = TemplateDebouncer::new(Duration::from_millis(50));

        let (first, second) = tokio::join!(debouncer.settle("study for exam"), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            debouncer.settle("buy milk").await
        });

        assert_eq!(first, None);
        assert_eq!(second, Some(match_templates("buy milk")));
    }
}
