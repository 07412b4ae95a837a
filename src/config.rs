//! Configuration types.
//!
//! Read once at process start from environment variables. Defaults target a
//! local Ollama server exposing the OpenAI-compatible API.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE: &str = "http://localhost:11434/v1";
pub const DEFAULT_MODEL: &str = "phi3:latest";
/// Ollama ignores the credential but the OpenAI wire format requires one.
pub const DEFAULT_API_KEY: &str = "null";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the model backend, e.g. `http://localhost:11434/v1`.
    pub api_base: String,
    /// Model identifier sent with every request.
    pub model: String,
    pub api_key: SecretString,
    /// Upper bound on a single completion call.
    pub request_timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Per-agent memory flags.
    pub intake_memory: bool,
    pub advisor_memory: bool,
    /// Optional directory for rolling log files.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: SecretString::from(DEFAULT_API_KEY),
            request_timeout: Duration::from_secs(120),
            temperature: 0.7,
            max_tokens: 2048,
            intake_memory: true,
            advisor_memory: true,
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// Each option is read from its `CAREER_EXPLORER_*` variable first, then
    /// from the conventional `OPENAI_*` variable where one exists.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let first = |keys: &[&str]| keys.iter().find_map(|k| lookup(*k));

        let api_base = first(&["CAREER_EXPLORER_API_BASE", "OPENAI_API_BASE"])
            .unwrap_or(defaults.api_base);
        let api_base = api_base.trim().trim_end_matches('/').to_string();
        if api_base.is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "CAREER_EXPLORER_API_BASE".to_string(),
                hint: "Set it to the model backend URL, e.g. http://localhost:11434/v1".to_string(),
            });
        }

        let model = first(&["CAREER_EXPLORER_MODEL", "OPENAI_MODEL_NAME"])
            .map(|m| m.trim().to_string())
            .unwrap_or(defaults.model);
        if model.is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "CAREER_EXPLORER_MODEL".to_string(),
                hint: "Set it to a model name served by the backend, e.g. phi3:latest".to_string(),
            });
        }

        let api_key = first(&["CAREER_EXPLORER_API_KEY", "OPENAI_API_KEY"])
            .map(SecretString::from)
            .unwrap_or(defaults.api_key);

        let request_timeout = match lookup("CAREER_EXPLORER_TIMEOUT_SECS") {
            Some(raw) => match parse_value::<u64>("CAREER_EXPLORER_TIMEOUT_SECS", &raw)? {
                0 => {
                    return Err(ConfigError::InvalidValue {
                        key: "CAREER_EXPLORER_TIMEOUT_SECS".to_string(),
                        message: "must be greater than zero".to_string(),
                    });
                }
                secs => Duration::from_secs(secs),
            },
            None => defaults.request_timeout,
        };

        let temperature = match lookup("CAREER_EXPLORER_TEMPERATURE") {
            Some(raw) => parse_value("CAREER_EXPLORER_TEMPERATURE", &raw)?,
            None => defaults.temperature,
        };

        let max_tokens = match lookup("CAREER_EXPLORER_MAX_TOKENS") {
            Some(raw) => parse_value("CAREER_EXPLORER_MAX_TOKENS", &raw)?,
            None => defaults.max_tokens,
        };

        let intake_memory = match lookup("CAREER_EXPLORER_INTAKE_MEMORY") {
            Some(raw) => parse_flag("CAREER_EXPLORER_INTAKE_MEMORY", &raw)?,
            None => defaults.intake_memory,
        };

        let advisor_memory = match lookup("CAREER_EXPLORER_ADVISOR_MEMORY") {
            Some(raw) => parse_flag("CAREER_EXPLORER_ADVISOR_MEMORY", &raw)?,
            None => defaults.advisor_memory,
        };

        let log_dir = lookup("CAREER_EXPLORER_LOG_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            api_base,
            model,
            api_key,
            request_timeout,
            temperature,
            max_tokens,
            intake_memory,
            advisor_memory,
            log_dir,
        })
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got '{other}'"),
        }),
    }
}
