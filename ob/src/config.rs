//! Orbit configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main Orbit configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model provider configuration
    pub llm: LlmConfig,

    /// Free-plan limits
    pub limits: LimitsConfig,

    /// Log level for the session log file (overridden by --log-level)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate configuration before use
    ///
    /// A missing API key is reported as a configuration error with the
    /// variable name; callers decide whether that disables the coach or
    /// aborts the command.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.llm.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "Gemini API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .orbit.yml
        let local_config = PathBuf::from(".orbit.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/orbit/orbit.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("orbit").join("orbit.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read just the log level from the config file, before logging exists
    ///
    /// Errors are swallowed on purpose: a broken config file is reported by
    /// the real `load` call once logging is up.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let path = match config_path {
            Some(p) => p.clone(),
            None => {
                let local = PathBuf::from(".orbit.yml");
                if local.exists() {
                    local
                } else {
                    dirs::config_dir()?.join("orbit").join("orbit.yml")
                }
            }
        };

        let content = fs::read_to_string(path).ok()?;
        let config: Config = serde_yaml::from_str(&content).ok()?;
        config.log_level
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Model provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "gemini" supported)
    pub provider: String,

    /// Model for coach conversations
    pub model: String,

    /// Cheaper model for one-shot utility calls like habit suggestions
    #[serde(rename = "fast-model")]
    pub fast_model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-3-pro-preview".to_string(),
            fast_model: "gemini-2.5-flash-lite-latest".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            max_tokens: 1024,
            timeout_ms: 30_000,
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok()
    }

    /// The same configuration pointed at the fast model
    pub fn for_fast(&self) -> Self {
        Self {
            model: self.fast_model.clone(),
            ..self.clone()
        }
    }
}

/// Free-plan limits
///
/// Policy knobs only: the habit store itself has no notion of plans.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Habits a free session may hold
    #[serde(rename = "max-free-habits")]
    pub max_free_habits: usize,

    /// Coach messages a free session may send
    #[serde(rename = "max-free-chat-turns")]
    pub max_free_chat_turns: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_free_habits: 5,
            max_free_chat_turns: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.limits.max_free_habits, 5);
        assert_eq!(config.limits.max_free_chat_turns, 3);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_llm_config_defaults() {
        let config = LlmConfig::default();

        assert_eq!(config.provider, "gemini");
        assert!(config.model.contains("gemini"));
        assert_eq!(config.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.base_url, "https://generativelanguage.googleapis.com");
    }

    #[test]
    fn test_for_fast_swaps_model_only() {
        let config = LlmConfig::default();
        let fast = config.for_fast();

        assert_eq!(fast.model, config.fast_model);
        assert_eq!(fast.base_url, config.base_url);
        assert_eq!(fast.api_key_env, config.api_key_env);
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
llm:
  provider: gemini
  model: gemini-3-pro-preview
  fast-model: gemini-2.5-flash-lite-latest
  api-key-env: MY_API_KEY
  base-url: https://example.com
  max-tokens: 2048
  timeout-ms: 60000

limits:
  max-free-habits: 3
  max-free-chat-turns: 1

log-level: debug
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.api_key_env, "MY_API_KEY");
        assert_eq!(config.llm.max_tokens, 2048);
        assert_eq!(config.llm.timeout_ms, 60000);
        assert_eq!(config.limits.max_free_habits, 3);
        assert_eq!(config.limits.max_free_chat_turns, 1);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
llm:
  model: gemini-flash-next
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.llm.model, "gemini-flash-next");

        // Defaults for unspecified
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.llm.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.limits.max_free_habits, 5);
    }

    #[test]
    #[serial]
    fn test_validate_reports_missing_key() {
        let mut config = Config::default();
        config.llm.api_key_env = "ORBIT_TEST_ABSENT_KEY".to_string();
        // SAFETY: serialized test, no other thread reads the environment
        unsafe { std::env::remove_var("ORBIT_TEST_ABSENT_KEY") };

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ORBIT_TEST_ABSENT_KEY"));
    }

    #[test]
    #[serial]
    fn test_validate_passes_with_key() {
        let mut config = Config::default();
        config.llm.api_key_env = "ORBIT_TEST_PRESENT_KEY".to_string();
        // SAFETY: serialized test, no other thread reads the environment
        unsafe { std::env::set_var("ORBIT_TEST_PRESENT_KEY", "key-value") };

        assert!(config.validate().is_ok());
        assert_eq!(config.llm.api_key().as_deref(), Some("key-value"));

        unsafe { std::env::remove_var("ORBIT_TEST_PRESENT_KEY") };
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "limits:\n  max-free-habits: 9").unwrap();

        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.limits.max_free_habits, 9);
    }

    #[test]
    fn test_load_explicit_path_missing_is_error() {
        let missing = PathBuf::from("/nonexistent/orbit.yml");
        assert!(Config::load(Some(&missing)).is_err());
    }
}
