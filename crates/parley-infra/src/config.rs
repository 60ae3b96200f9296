//! Service configuration loader for Parley.
//!
//! Reads `parley.toml` (or whatever `--config` points at) and deserializes it
//! into [`ServiceConfig`]. A missing file means defaults. A malformed file is
//! an error here; `serve` downgrades it to a warning once logging is up,
//! `check-config` reports it and exits.

use std::path::Path;

use anyhow::Context;
use secrecy::SecretString;

use parley_types::config::ServiceConfig;

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`ServiceConfig::default()`].
/// - Otherwise returns the parsed config.
///
/// # Errors
///
/// Fails if the file exists but cannot be read or is not valid TOML for
/// [`ServiceConfig`].
pub async fn load_service_config(path: &Path) -> anyhow::Result<ServiceConfig> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(ServiceConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
    };

    toml::from_str::<ServiceConfig>(&content)
        .with_context(|| format!("failed to parse {}", path.display()))
}

/// Read the API key from the environment variable `var`.
///
/// Unset, non-Unicode and blank values all count as missing.
pub fn resolve_api_key(var: &str) -> Option<SecretString> {
    secret_from_value(std::env::var(var).ok())
}

fn secret_from_value(value: Option<String>) -> Option<SecretString> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(SecretString::from(trimmed.to_string()))
    }
}
