//! Orbit - AI habit tracker
//!
//! CLI entry point for the habit REPL and the one-shot commands.

use std::fs;
use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches};
use eyre::{Context, Result};
use tracing::{debug, info};

use std::sync::Arc;

use orbit::cli::{Cli, Command, generate_after_help};
use orbit::coach::suggest_habits;
use orbit::config::Config;
use orbit::llm::{LlmClient, create_client};
use orbit::prompts::PromptLoader;
use orbit::repl;
use orbit::vision::{ImageSize, VisionBoard};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("orbit")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level_str = cli_log_level.or(config_log_level);
    let level = if let Some(s) = level_str {
        match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        }
    } else {
        tracing::Level::INFO
    };

    let log_file = fs::File::create(log_dir.join("orbit.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Build command with dynamic after_help that shows credential and log locations
    let cmd = Cli::command().after_help(generate_after_help());

    // Parse CLI arguments using the modified command
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Orbit loaded config: model={}", config.llm.model);

    // Dispatch command
    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Suggest { count }) => {
            debug!("main: matched Suggest command");
            cmd_suggest(&config, count).await
        }
        Some(Command::Vision { prompt, size }) => {
            debug!("main: matched Vision command");
            cmd_vision(&prompt, size)
        }
        Some(Command::Repl) | None => {
            debug!("main: starting REPL");
            repl::run_interactive(&config).await
        }
    }
}

/// One-shot habit suggestions from the fast model
async fn cmd_suggest(config: &Config, count: usize) -> Result<()> {
    debug!(count, "cmd_suggest: called");
    // Validate the API key early; suggestions cannot fall back to offline
    config.validate()?;

    let llm: Arc<dyn LlmClient> = create_client(&config.llm.for_fast()).context("Failed to create model client")?;
    let prompts = PromptLoader::new(".");

    let suggestions = suggest_habits(&llm, &prompts, count).await?;
    if suggestions.is_empty() {
        println!("The model returned no usable suggestions.");
        return Ok(());
    }

    for (i, suggestion) in suggestions.iter().enumerate() {
        println!("{}. {}", i + 1, suggestion);
    }
    Ok(())
}

/// One-shot mock vision generation, works without an API key
fn cmd_vision(prompt: &str, size: ImageSize) -> Result<()> {
    debug!(%prompt, %size, "cmd_vision: called");
    let mut board = VisionBoard::new();
    let item = board.generate(prompt, size);

    println!("Vision generated! (Simulated for this demo)");
    println!("  prompt: {}", item.prompt);
    println!("  size:   {}", item.size);
    println!("  url:    {}", item.image_url);
    Ok(())
}
