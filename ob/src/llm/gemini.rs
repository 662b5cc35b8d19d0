//! Gemini API client implementation
//!
//! Implements the LlmClient trait for the Google Generative Language API
//! with support for both blocking and streaming responses.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use reqwest_eventsource::{Event, EventSource};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{
    CompletionRequest, CompletionResponse, FinishReason, LlmClient, LlmError, Message, StreamChunk, TokenUsage,
};
use crate::config::LlmConfig;

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

/// Gemini API client
pub struct GeminiClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    timeout: Duration,
}

impl GeminiClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config; a
    /// missing key is a configuration error, not a crash.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = config.model, "from_config: called");
        let api_key = config.api_key().ok_or_else(|| LlmError::MissingApiKey {
            env: config.api_key_env.clone(),
        })?;

        let timeout = Duration::from_millis(config.timeout_ms);

        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.clone(),
            http,
            max_tokens: config.max_tokens,
            timeout,
        })
    }

    /// Build the URL for an API method on the configured model
    fn endpoint(&self, method: &str) -> String {
        format!("{}/v1beta/models/{}:{}", self.base_url, self.model, method)
    }

    /// Build the request body for the generateContent API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(model = self.model, max_tokens = request.max_tokens, "build_request_body: called");
        let mut body = serde_json::json!({
            "contents": self.convert_messages(&request.messages),
            "generationConfig": {
                "maxOutputTokens": request.max_tokens.min(self.max_tokens),
            },
        });

        if !request.system_prompt.is_empty() {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": request.system_prompt }]
            });
        }

        body
    }

    /// Convert internal Message types to Gemini contents format
    fn convert_messages(&self, messages: &[Message]) -> Vec<serde_json::Value> {
        messages
            .iter()
            .map(|msg| {
                serde_json::json!({
                    "role": msg.role,
                    "parts": [{ "text": msg.text }],
                })
            })
            .collect()
    }

    /// Parse the generateContent API response
    fn parse_response(&self, api_response: GenerateResponse) -> Result<CompletionResponse, LlmError> {
        if let Some(feedback) = &api_response.prompt_feedback
            && let Some(reason) = &feedback.block_reason
        {
            debug!(reason, "parse_response: prompt blocked");
            return Err(LlmError::Blocked { reason: reason.clone() });
        }

        let candidate = api_response
            .candidates
            .and_then(|c| c.into_iter().next())
            .ok_or_else(|| LlmError::InvalidResponse("No candidates in response".to_string()))?;

        let finish_reason = candidate
            .finish_reason
            .as_deref()
            .map(FinishReason::from_gemini)
            .unwrap_or(FinishReason::Stop);

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|t| !t.is_empty());

        if finish_reason == FinishReason::Safety && text.is_none() {
            return Err(LlmError::Blocked {
                reason: "response stopped by safety filters".to_string(),
            });
        }

        let usage = api_response
            .usage_metadata
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count.unwrap_or(0),
                response_tokens: u.candidates_token_count.unwrap_or(0),
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            text,
            finish_reason,
            usage,
        })
    }

    /// Map a reqwest error, distinguishing client-side timeouts
    fn map_send_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else {
            LlmError::Network(e)
        }
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(model = self.model, max_tokens = request.max_tokens, "complete: called");
        let url = self.endpoint("generateContent");
        let body = self.build_request_body(&request);

        let mut last_error = None;
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!(
                    attempt,
                    backoff_ms = backoff,
                    "complete: retrying after transient error"
                );
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let response = match self
                .http
                .post(url.clone())
                .header("x-goog-api-key", self.api_key.clone())
                .header("content-type", "application/json")
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    debug!(attempt, error = %e, "complete: send error");
                    last_error = Some(self.map_send_error(e));
                    continue;
                }
            };

            let status = response.status().as_u16();

            if status == 429 {
                debug!("complete: rate limited (429)");
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);

                return Err(LlmError::RateLimited {
                    retry_after: Duration::from_secs(retry_after),
                });
            }

            if is_retryable_status(status) && attempt < MAX_RETRIES {
                let text = response.text().await.unwrap_or_default();
                debug!(attempt, status, "complete: retryable error");
                last_error = Some(parse_api_error(status, &text));
                continue;
            }

            if !response.status().is_success() {
                debug!(status, "complete: API error");
                let text = response.text().await.unwrap_or_default();
                return Err(parse_api_error(status, &text));
            }

            debug!("complete: success");
            let api_response: GenerateResponse = response.json().await?;
            return self.parse_response(api_response);
        }

        Err(last_error.unwrap_or_else(|| LlmError::InvalidResponse("Max retries exceeded".to_string())))
    }

    async fn stream(
        &self,
        request: CompletionRequest,
        chunk_tx: mpsc::Sender<StreamChunk>,
    ) -> Result<CompletionResponse, LlmError> {
        debug!(model = self.model, max_tokens = request.max_tokens, "stream: called");
        let url = format!("{}?alt=sse", self.endpoint("streamGenerateContent"));
        let body = self.build_request_body(&request);

        let http_request = self
            .http
            .post(url)
            .header("x-goog-api-key", self.api_key.clone())
            .header("content-type", "application/json")
            .json(&body);

        let mut es = EventSource::new(http_request).map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let mut full_content = String::new();
        let mut finish_reason = FinishReason::Stop;
        let mut usage = TokenUsage::default();

        while let Some(event) = es.next().await {
            match event {
                Ok(Event::Message(msg)) => {
                    let chunk: GenerateResponse = serde_json::from_str(&msg.data).map_err(LlmError::Json)?;

                    if let Some(feedback) = &chunk.prompt_feedback
                        && let Some(reason) = &feedback.block_reason
                    {
                        debug!(reason, "stream: prompt blocked");
                        let err = LlmError::Blocked { reason: reason.clone() };
                        let _ = chunk_tx.send(StreamChunk::Error(err.to_string())).await;
                        return Err(err);
                    }

                    if let Some(candidates) = &chunk.candidates {
                        for candidate in candidates {
                            if let Some(content) = &candidate.content {
                                for part in &content.parts {
                                    if let Some(text) = &part.text {
                                        full_content.push_str(text);
                                        let _ = chunk_tx.send(StreamChunk::TextDelta(text.clone())).await;
                                    }
                                }
                            }
                            if let Some(fr) = &candidate.finish_reason {
                                debug!(finish_reason = fr, "stream: finish reason");
                                finish_reason = FinishReason::from_gemini(fr);
                            }
                        }
                    }

                    if let Some(u) = &chunk.usage_metadata {
                        usage.prompt_tokens = u.prompt_token_count.unwrap_or(0);
                        usage.response_tokens = u.candidates_token_count.unwrap_or(0);
                    }
                }
                Ok(Event::Open) => {
                    debug!("stream: Event::Open");
                }
                Err(reqwest_eventsource::Error::StreamEnded) => {
                    debug!("stream: ended");
                    break;
                }
                Err(reqwest_eventsource::Error::InvalidStatusCode(code, response)) => {
                    let status = code.as_u16();
                    let text = response.text().await.unwrap_or_default();
                    let err = parse_api_error(status, &text);
                    debug!(status, "stream: API error");
                    let _ = chunk_tx.send(StreamChunk::Error(err.to_string())).await;
                    return Err(err);
                }
                Err(e) => {
                    debug!(error = %e, "stream: event error");
                    let _ = chunk_tx.send(StreamChunk::Error(e.to_string())).await;
                    return Err(LlmError::InvalidResponse(e.to_string()));
                }
            }
        }

        debug!("stream: complete");
        let _ = chunk_tx
            .send(StreamChunk::MessageDone {
                finish_reason,
                usage,
            })
            .await;

        Ok(CompletionResponse {
            text: if full_content.is_empty() { None } else { Some(full_content) },
            finish_reason,
            usage,
        })
    }
}

/// Map a non-success body to an error, using Google's envelope when present
fn parse_api_error(status: u16, body: &str) -> LlmError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => LlmError::ApiError {
            status: envelope.error.code.unwrap_or(status),
            message: envelope.error.message,
        },
        Err(_) => LlmError::ApiError {
            status,
            message: body.to_string(),
        },
    }
}

// Gemini API response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u64>,
    candidates_token_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: GoogleError,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    code: Option<u16>,
    message: String,
}
