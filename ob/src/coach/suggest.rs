//! Habit suggestions
//!
//! One-shot call to the fast model asking for comma-separated habit ideas.

use std::sync::Arc;

use tracing::{debug, info};

use crate::llm::{CompletionRequest, LlmClient, LlmError, Message};
use crate::prompts::PromptLoader;

/// Max tokens for a suggestion call - the reply is a short list
const SUGGEST_MAX_TOKENS: u32 = 256;

/// Ask the fast model for `count` habit suggestions
pub async fn suggest_habits(
    client: &Arc<dyn LlmClient>,
    prompts: &PromptLoader,
    count: usize,
) -> Result<Vec<String>, LlmError> {
    debug!(%count, "suggest_habits: called");
    let prompt = prompts
        .suggest_prompt(count)
        .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

    let request = CompletionRequest {
        system_prompt: String::new(),
        messages: vec![Message::user(prompt)],
        max_tokens: SUGGEST_MAX_TOKENS,
    };

    let response = client.complete(request).await?;
    let text = response
        .text
        .ok_or_else(|| LlmError::InvalidResponse("Model returned no text".to_string()))?;

    let suggestions = parse_suggestions(&text, count);
    info!(returned = suggestions.len(), "suggest_habits: parsed suggestions");
    Ok(suggestions)
}

/// Split a model reply into clean suggestion titles
///
/// Accepts comma-separated output as well as bulleted or numbered lines.
/// Returns at most `count` suggestions; blank fragments are dropped.
pub fn parse_suggestions(text: &str, count: usize) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.lines() {
        for fragment in line.split(',') {
            let cleaned = clean_fragment(fragment);
            if !cleaned.is_empty() {
                out.push(cleaned);
            }
            if out.len() == count {
                return out;
            }
        }
    }
    out
}

/// Strip list markers and surrounding punctuation from one fragment
fn clean_fragment(fragment: &str) -> String {
    let mut s = fragment.trim();

    // Numbered markers like "1." or "2)" but not a leading number that is
    // part of the title ("10 minute walk")
    let digits = s.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &s[digits..];
        if let Some(stripped) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            s = stripped;
        }
    }

    s.trim_start_matches(['-', '*', '•']).trim().trim_matches('"').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock::MockLlmClient;

    #[test]
    fn test_parse_comma_separated() {
        let parsed = parse_suggestions("Drink water, Read 10 pages, Stretch", 3);
        assert_eq!(parsed, vec!["Drink water", "Read 10 pages", "Stretch"]);
    }

    #[test]
    fn test_parse_numbered_lines() {
        let text = "1. Drink water\n2. Read 10 pages\n3) Stretch";
        let parsed = parse_suggestions(text, 3);
        assert_eq!(parsed, vec!["Drink water", "Read 10 pages", "Stretch"]);
    }

    #[test]
    fn test_parse_bulleted_lines() {
        let text = "- Meditate\n* Walk outside\n• Journal";
        let parsed = parse_suggestions(text, 3);
        assert_eq!(parsed, vec!["Meditate", "Walk outside", "Journal"]);
    }

    #[test]
    fn test_parse_drops_blank_fragments() {
        let parsed = parse_suggestions("Meditate,, Walk outside, ", 5);
        assert_eq!(parsed, vec!["Meditate", "Walk outside"]);
    }

    #[test]
    fn test_parse_caps_at_count() {
        let parsed = parse_suggestions("a, b, c, d, e", 3);
        assert_eq!(parsed, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_keeps_leading_number_in_title() {
        let parsed = parse_suggestions("10 minute walk, 5 deep breaths", 2);
        assert_eq!(parsed, vec!["10 minute walk", "5 deep breaths"]);
    }

    #[tokio::test]
    async fn test_suggest_habits_parses_reply() {
        let client: Arc<dyn LlmClient> =
            Arc::new(MockLlmClient::replies(&["Drink water, Meditate, Stretch"]));
        let prompts = PromptLoader::embedded_only();

        let suggestions = suggest_habits(&client, &prompts, 3).await.unwrap();
        assert_eq!(suggestions, vec!["Drink water", "Meditate", "Stretch"]);
    }

    #[tokio::test]
    async fn test_suggest_habits_propagates_gateway_error() {
        let client: Arc<dyn LlmClient> = Arc::new(MockLlmClient::new(vec![]));
        let prompts = PromptLoader::embedded_only();

        let result = suggest_habits(&client, &prompts, 3).await;
        assert!(result.is_err());
    }
}
