//! Service configuration types for Parley.
//!
//! `ServiceConfig` represents the optional `parley.toml` file that controls
//! the model persona, storage locations and a few server defaults.

use serde::{Deserialize, Deserializer, Serialize};

/// Top-level configuration. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Persona and generation settings handed to the model adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier (e.g., "gemini-2.0-flash").
    #[serde(default = "default_model_name")]
    pub name: String,

    /// Sampling temperature. Kept low so replies stay close to deterministic.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// System instruction sent with every request.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Override the default API base URL (useful for testing or proxies).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upper bound on a single generation round trip.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_model_name() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_temperature() -> f64 {
    0.2
}

fn default_system_prompt() -> String {
    "You are Captain Jack Sparrow. Answer every question with wit and iconic dialogues.".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_output_tokens() -> u32 {
    2048
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            temperature: default_temperature(),
            system_prompt: default_system_prompt(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

/// Where the flat-file history and the log file live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_history_file")]
    pub history_file: String,

    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_history_file() -> String {
    "chat_history.json".to_string()
}

fn default_log_file() -> String {
    "parley.log".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            history_file: default_history_file(),
            log_file: default_log_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Session used when a chat request omits `session_id`. A blank value
    /// falls back to `default_session`.
    #[serde(
        default = "default_session_id",
        deserialize_with = "deserialize_session_id"
    )]
    pub default_session_id: String,

    /// Number of lines returned by the debug log endpoint.
    #[serde(default = "default_log_tail_lines")]
    pub log_tail_lines: usize,
}

fn default_session_id() -> String {
    "default_session".to_string()
}

fn deserialize_session_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let id = String::deserialize(deserializer)?;
    if id.trim().is_empty() {
        Ok(default_session_id())
    } else {
        Ok(id)
    }
}

fn default_log_tail_lines() -> usize {
    100
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            default_session_id: default_session_id(),
            log_tail_lines: default_log_tail_lines(),
        }
    }
}
