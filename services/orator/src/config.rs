use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
    #[error("Could not read config file {0}: {1}")]
    InvalidFile(PathBuf, String),
}

/// Settings for the speech-to-text service used in voice input.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeechConfig {
    pub api_base: String,
    /// Without a key, recognition reports a service error instead of recording.
    pub api_key: Option<String>,
    pub model: String,
    pub max_duration: Duration,
    /// Whole-request timeout for one upload; expiry is a service error.
    pub timeout: Duration,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: String,
    pub config_file: PathBuf,
    pub api_base: String,
    pub chat_model: String,
    pub request_timeout: Duration,
    pub progress_path: PathBuf,
    pub log_level: Level,
    pub speech: SpeechConfig,
    pub tts_command: String,
}

fn default_tts_command() -> &'static str {
    if cfg!(target_os = "macos") { "say" } else { "espeak" }
}

fn parse_secs(var: &str, default: u64) -> Result<Duration, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    var.to_string(),
                    format!("'{}' is not a positive number of seconds", raw),
                )
            }),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}

/// Reads `XAI_API_KEY` from a JSON config file. A missing file yields `None`.
fn api_key_from_file(path: &Path) -> Result<Option<String>, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ConfigError::InvalidFile(path.to_path_buf(), e.to_string())),
    };
    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| ConfigError::InvalidFile(path.to_path_buf(), e.to_string()))?;
    Ok(value
        .get("XAI_API_KEY")
        .and_then(|v| v.as_str())
        .filter(|key| !key.is_empty())
        .map(str::to_string))
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_file(None)
    }

    /// Loads configuration, reading the fallback credential from `config_file`
    /// instead of `ORATOR_CONFIG_FILE` when one is given.
    pub fn from_env_with_file(config_file: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let config_file = config_file
            .or_else(|| std::env::var("ORATOR_CONFIG_FILE").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("config.json"));

        let api_key = match std::env::var("XAI_API_KEY").ok().filter(|k| !k.is_empty()) {
            Some(key) => key,
            None => api_key_from_file(&config_file)?.ok_or_else(|| {
                ConfigError::MissingVar(format!(
                    "XAI_API_KEY must be set in the environment or in {}",
                    config_file.display()
                ))
            })?,
        };

        let api_base =
            std::env::var("AI_API_BASE").unwrap_or_else(|_| "https://api.x.ai/v1".to_string());
        let chat_model =
            std::env::var("CHAT_MODEL").unwrap_or_else(|_| "grok-2-latest".to_string());
        let request_timeout = parse_secs("REQUEST_TIMEOUT_SECS", 60)?;

        let progress_path = std::env::var("PROGRESS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("progress.json"));

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "WARN".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let speech = SpeechConfig {
            api_base: std::env::var("SPEECH_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            api_key: std::env::var("SPEECH_API_KEY").ok().filter(|k| !k.is_empty()),
            model: std::env::var("SPEECH_MODEL").unwrap_or_else(|_| "whisper-1".to_string()),
            max_duration: parse_secs("SPEECH_MAX_SECONDS", 30)?,
            timeout: parse_secs("SPEECH_TIMEOUT_SECS", 60)?,
        };

        let tts_command =
            std::env::var("TTS_COMMAND").unwrap_or_else(|_| default_tts_command().to_string());

        Ok(Self {
            api_key,
            config_file,
            api_base,
            chat_model,
            request_timeout,
            progress_path,
            log_level,
            speech,
            tts_command,
        })
    }
}
