//! AI Coach
//!
//! Chat flow between the user and the model: transcript management, the
//! persona prompt, and one-shot habit suggestions.

use std::sync::Arc;

use habitstore::HabitSummary;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::llm::{CompletionRequest, LlmClient, LlmError, StreamChunk};
use crate::prompts::PromptLoader;

mod suggest;
mod transcript;

pub use suggest::{parse_suggestions, suggest_habits};
pub use transcript::{ChatMessage, GREETING, Transcript};

/// Chat side of the coach
///
/// Owns prompt rendering and request assembly. The transcript lives with the
/// session so the conversation survives independent of the client.
pub struct Coach {
    client: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    max_tokens: u32,
}

impl Coach {
    pub fn new(client: Arc<dyn LlmClient>, prompts: PromptLoader, max_tokens: u32) -> Self {
        Self {
            client,
            prompts,
            max_tokens,
        }
    }

    /// Ask the coach a question
    ///
    /// Appends the user turn, sends the whole transcript with the persona
    /// prompt, and appends the model turn only when the call succeeds. On
    /// failure the user turn stays in the transcript and the error surfaces
    /// to the caller.
    pub async fn ask(
        &self,
        transcript: &mut Transcript,
        prompt: &str,
        habits: Vec<HabitSummary>,
    ) -> Result<String, LlmError> {
        debug!(prompt_len = prompt.len(), "Coach::ask: called");
        transcript.push_user(prompt);

        let request = self.build_request(transcript, habits)?;
        let response = self.client.complete(request).await?;
        let text = response
            .text
            .ok_or_else(|| LlmError::InvalidResponse("Model returned no text".to_string()))?;

        transcript.push_model(&text);
        info!(turns = transcript.messages().len(), "Coach::ask: exchange complete");
        Ok(text)
    }

    /// Like [`Coach::ask`] but streams deltas into `chunk_tx` while generating
    pub async fn ask_streaming(
        &self,
        transcript: &mut Transcript,
        prompt: &str,
        habits: Vec<HabitSummary>,
        chunk_tx: mpsc::Sender<StreamChunk>,
    ) -> Result<String, LlmError> {
        debug!(prompt_len = prompt.len(), "Coach::ask_streaming: called");
        transcript.push_user(prompt);

        let request = self.build_request(transcript, habits)?;
        let response = self.client.stream(request, chunk_tx).await?;
        let text = response
            .text
            .ok_or_else(|| LlmError::InvalidResponse("Model returned no text".to_string()))?;

        transcript.push_model(&text);
        info!(
            turns = transcript.messages().len(),
            "Coach::ask_streaming: exchange complete"
        );
        Ok(text)
    }

    fn build_request(
        &self,
        transcript: &Transcript,
        habits: Vec<HabitSummary>,
    ) -> Result<CompletionRequest, LlmError> {
        let system_prompt = self
            .prompts
            .coach_prompt(habits)
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        Ok(CompletionRequest {
            system_prompt,
            messages: transcript.to_messages(),
            max_tokens: self.max_tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;
    use crate::llm::client::mock::MockLlmClient;

    fn coach_with(responses: MockLlmClient) -> Coach {
        Coach::new(Arc::new(responses), PromptLoader::embedded_only(), 1024)
    }

    #[tokio::test]
    async fn test_ask_appends_model_turn_on_success() {
        let coach = coach_with(MockLlmClient::replies(&["Try a two minute version first."]));
        let mut transcript = Transcript::new();

        let reply = coach
            .ask(&mut transcript, "How do I start meditating?", vec![])
            .await
            .unwrap();

        assert_eq!(reply, "Try a two minute version first.");
        assert_eq!(transcript.messages().len(), 3);
        assert_eq!(transcript.messages()[1].role, Role::User);
        assert_eq!(transcript.messages()[2].role, Role::Model);
        assert_eq!(transcript.messages()[2].text, reply);
    }

    #[tokio::test]
    async fn test_ask_failure_keeps_user_turn_only() {
        let coach = coach_with(MockLlmClient::new(vec![]));
        let mut transcript = Transcript::new();

        let result = coach.ask(&mut transcript, "Are you there?", vec![]).await;

        assert!(result.is_err());
        assert_eq!(transcript.messages().len(), 2);
        assert_eq!(transcript.messages()[1].role, Role::User);
        assert_eq!(transcript.messages()[1].text, "Are you there?");
    }

    #[tokio::test]
    async fn test_ask_recovers_on_next_call() {
        let coach = coach_with(MockLlmClient::replies(&["Back online."]));
        let mut transcript = Transcript::new();

        // First exchange fails before reaching the mock reply
        let failing = coach_with(MockLlmClient::new(vec![]));
        let _ = failing.ask(&mut transcript, "hello?", vec![]).await;
        assert_eq!(transcript.messages().len(), 2);

        let reply = coach.ask(&mut transcript, "still there?", vec![]).await.unwrap();
        assert_eq!(reply, "Back online.");
        assert_eq!(transcript.messages().len(), 4);
    }

    #[tokio::test]
    async fn test_ask_streaming_delivers_chunks() {
        let coach = coach_with(MockLlmClient::replies(&["Nice work on the streak!"]));
        let mut transcript = Transcript::new();
        let (tx, mut rx) = mpsc::channel(16);

        let reply = coach
            .ask_streaming(&mut transcript, "I hit day seven", vec![], tx)
            .await
            .unwrap();

        let mut streamed = String::new();
        let mut done = false;
        while let Some(chunk) = rx.recv().await {
            match chunk {
                StreamChunk::TextDelta(delta) => streamed.push_str(&delta),
                StreamChunk::MessageDone { .. } => done = true,
                StreamChunk::Error(e) => panic!("unexpected stream error: {}", e),
            }
        }

        assert_eq!(reply, "Nice work on the streak!");
        assert_eq!(streamed, reply);
        assert!(done);
        assert_eq!(transcript.messages().len(), 3);
    }
}
