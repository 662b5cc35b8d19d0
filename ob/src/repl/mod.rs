//! Interactive REPL for Orbit
//!
//! One session per run: the habit store, coach transcript, and vision
//! board live here and are gone on exit.

mod render;
mod session;

pub use session::ReplSession;

use std::sync::Arc;

use eyre::Result;
use tracing::info;

use crate::config::Config;
use crate::llm::{LlmClient, create_client};

/// Run the interactive REPL
///
/// The entry point for `ob` / `ob repl`. A missing API key does not abort:
/// the coach goes offline and the habit commands keep working.
pub async fn run_interactive(config: &Config) -> Result<()> {
    let coach_llm: Option<Arc<dyn LlmClient>> = match create_client(&config.llm) {
        Ok(client) => Some(client),
        Err(e) => {
            info!("Coach client not available ({}). Habit tracking still works.", e);
            None
        }
    };

    let fast_llm: Option<Arc<dyn LlmClient>> = match create_client(&config.llm.for_fast()) {
        Ok(client) => Some(client),
        Err(e) => {
            info!("Fast model client not available ({})", e);
            None
        }
    };

    let mut session = ReplSession::new(config, coach_llm, fast_llm);
    session.run().await
}
