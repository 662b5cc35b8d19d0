//! Orbit - AI habit tracker for the terminal
//!
//! Orbit keeps a single user's habits for one sitting and pairs them with a
//! Gemini-backed coach. Nothing persists: the store, the conversation, and
//! the vision board all live for exactly one session.
//!
//! # Core Concepts
//!
//! - **Session scope**: every run starts empty and ends empty
//! - **Coach sees the habits**: each chat turn carries a live habit summary
//! - **Free plan limits**: habit and chat caps apply until upgrade
//! - **Mocked vision board**: image generation never leaves the process
//!
//! # Modules
//!
//! - [`coach`] - Conversation transcript and the coach itself
//! - [`llm`] - Model client trait and the Gemini implementation
//! - [`session`] - Per-run state and free-plan gating
//! - [`vision`] - Mocked vision board
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod coach;
pub mod config;
pub mod llm;
pub mod prompts;
pub mod repl;
pub mod session;
pub mod vision;

// Re-export commonly used types
pub use coach::{ChatMessage, Coach, GREETING, Transcript, parse_suggestions, suggest_habits};
pub use config::{Config, LimitsConfig, LlmConfig};
pub use llm::{
    CompletionRequest, CompletionResponse, GeminiClient, LlmClient, LlmError, Message, Role, StreamChunk,
    create_client,
};
pub use prompts::{PromptContext, PromptLoader};
pub use session::{Session, SessionError};
pub use vision::{ImageSize, VisionBoard, VisionBoardItem};
