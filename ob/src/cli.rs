//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::vision::ImageSize;

/// Orbit - habit tracking with an AI coach
#[derive(Parser)]
#[command(name = "ob", about = "Habit tracking with an AI coach in your terminal", version)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the interactive session (default when no subcommand is given)
    Repl,

    /// Ask the fast model for habit suggestions
    Suggest {
        /// How many suggestions to ask for
        #[arg(short = 'n', long, default_value = "3")]
        count: usize,
    },

    /// Generate a mock vision board image
    Vision {
        /// What the ideal future looks like
        prompt: String,

        /// Render size (1K, 2K, 4K)
        #[arg(short, long, default_value = "1K")]
        size: ImageSize,
    },
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("orbit")
        .join("logs")
        .join("orbit.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Generate the after_help text with credential status
pub fn generate_after_help() -> String {
    debug!("generate_after_help: called");
    let key_set = std::env::var("GEMINI_API_KEY").is_ok();
    let log_path = get_log_path();

    let mut help = String::new();

    help.push_str("Gemini API:\n");
    let icon = if key_set {
        debug!("generate_after_help: API key is set");
        "\u{2705}"
    } else {
        debug!("generate_after_help: API key is not set");
        "\u{274C}"
    };
    let status = if key_set {
        "GEMINI_API_KEY set"
    } else {
        "GEMINI_API_KEY not set (habit tracking works, the coach does not)"
    };
    help.push_str(&format!("  {} {}\n", icon, status));

    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", log_path.display()));

    help
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::parse_from(["ob"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_repl() {
        let cli = Cli::parse_from(["ob", "repl"]);
        assert!(matches!(cli.command, Some(Command::Repl)));
    }

    #[test]
    fn test_cli_parse_suggest_default_count() {
        let cli = Cli::parse_from(["ob", "suggest"]);
        assert!(matches!(cli.command, Some(Command::Suggest { count: 3 })));
    }

    #[test]
    fn test_cli_parse_suggest_with_count() {
        let cli = Cli::parse_from(["ob", "suggest", "-n", "5"]);
        assert!(matches!(cli.command, Some(Command::Suggest { count: 5 })));
    }

    #[test]
    fn test_cli_parse_vision() {
        let cli = Cli::parse_from(["ob", "vision", "a quiet cabin by a lake"]);
        if let Some(Command::Vision { prompt, size }) = cli.command {
            assert_eq!(prompt, "a quiet cabin by a lake");
            assert_eq!(size, ImageSize::Standard1K);
        } else {
            panic!("Expected Vision command");
        }
    }

    #[test]
    fn test_cli_parse_vision_with_size() {
        let cli = Cli::parse_from(["ob", "vision", "sunrise run", "--size", "4K"]);
        if let Some(Command::Vision { size, .. }) = cli.command {
            assert_eq!(size, ImageSize::Ultra4K);
        } else {
            panic!("Expected Vision command");
        }
    }

    #[test]
    fn test_cli_with_config() {
        let cli = Cli::parse_from(["ob", "-c", "/path/to/orbit.yml", "suggest"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/orbit.yml")));
    }

    #[test]
    fn test_cli_with_log_level() {
        let cli = Cli::parse_from(["ob", "--log-level", "debug", "repl"]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }
}
