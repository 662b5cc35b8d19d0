//! Chat transcript
//!
//! The ordered conversation between the user and the coach. A fresh
//! transcript always opens with the coach greeting, so the model side
//! speaks first.

use chrono::Utc;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::llm::{Message, Role};

/// Greeting the coach opens every session with
pub const GREETING: &str =
    "Hi! I'm Orbit, your personal productivity coach. How can I help you build better habits today?";

/// One chat turn
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Unique message id
    pub id: String,
    /// Who spoke
    pub role: Role,
    /// Message body
    pub text: String,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
}

impl ChatMessage {
    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            role,
            text: text.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Ordered conversation history, seeded with the greeting
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    /// Create a transcript opened by the coach greeting
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::new(Role::Model, GREETING)],
        }
    }

    /// Append a user turn
    pub fn push_user(&mut self, text: impl Into<String>) {
        let msg = ChatMessage::new(Role::User, text);
        debug!(id = msg.id, "Transcript::push_user: appending");
        self.messages.push(msg);
    }

    /// Append a model turn
    pub fn push_model(&mut self, text: impl Into<String>) {
        let msg = ChatMessage::new(Role::Model, text);
        debug!(id = msg.id, "Transcript::push_model: appending");
        self.messages.push(msg);
    }

    /// All turns, oldest first
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of user turns so far
    pub fn user_turns(&self) -> usize {
        self.messages.iter().filter(|m| m.role == Role::User).count()
    }

    /// Convert the transcript into gateway messages, oldest first
    pub fn to_messages(&self) -> Vec<Message> {
        self.messages
            .iter()
            .map(|m| Message {
                role: m.role,
                text: m.text.clone(),
            })
            .collect()
    }

    /// Drop the conversation and restore the opening greeting
    pub fn reset(&mut self) {
        debug!("Transcript::reset: called");
        self.messages = vec![ChatMessage::new(Role::Model, GREETING)];
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
