//! AI-backed suggestion agents.
//!
//! Agents turn trip parameters into structured output using a generative
//! model. All agents implement the `Agent` trait; failures are reported as
//! `AgentError` and the caller decides how to degrade.

pub mod backend;
pub mod itinerary;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during agent execution.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("AI backend not configured: {0}")]
    NotConfigured(String),

    #[error("AI backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("AI response unparseable: {0}")]
    ResponseParseError(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Rate limited by AI provider")]
    RateLimited,
}

/// Core trait for all AI agents.
#[async_trait]
pub trait Agent {
    type Input;
    type Output;

    /// Agent identifier for logging.
    fn name(&self) -> &'static str;

    /// Execute the agent's task. Agents make a single attempt.
    async fn execute(&self, input: Self::Input) -> Result<Self::Output, AgentError>;
}

/// Pull the JSON object out of a model reply.
///
/// Models often wrap JSON in markdown code fences or add a sentence before
/// or after it. Returns the input unchanged if no object is found.
pub fn extract_json(response: &str) -> &str {
    let mut text = response.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop the language tag line (```json) if present
        let rest = match rest.find('\n') {
            Some(i) => &rest[i + 1..],
            None => rest,
        };
        text = rest.trim_end().strip_suffix("```").unwrap_or(rest).trim();
    }

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_plain() {
        assert_eq!(extract_json(r#"{"a": 1}"#), r#"{"a": 1}"#);
    }

    #[test]
    fn test_extract_json_fenced() {
        let reply = "```json\n{\"suggestions\": []}\n```";
        assert_eq!(extract_json(reply), r#"{"suggestions": []}"#);
    }

    #[test]
    fn test_extract_json_fence_without_language() {
        let reply = "```\n{\"a\": {\"b\": 2}}\n```\n";
        assert_eq!(extract_json(reply), r#"{"a": {"b": 2}}"#);
    }

    #[test]
    fn test_extract_json_with_surrounding_prose() {
        let reply = "Here is your plan:\n{\"suggestions\": [1]}\nEnjoy!";
        assert_eq!(extract_json(reply), r#"{"suggestions": [1]}"#);
    }

    #[test]
    fn test_extract_json_no_object() {
        assert_eq!(extract_json("  sorry, no idea  "), "sorry, no idea");
    }
}
