//! `parley check-config`: print the effective configuration.

use std::path::Path;

use serde_json::json;

use parley_infra::config::{API_KEY_ENV, load_service_config, resolve_api_key};
use parley_types::config::ServiceConfig;

pub async fn run(config_path: &Path) -> anyhow::Result<()> {
    let config = load_service_config(config_path).await?;
    let report = build_report(
        config_path,
        &config,
        resolve_api_key(API_KEY_ENV).is_some(),
    )?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Effective configuration plus where it came from. The API key itself is
/// never included, only whether it is set.
fn build_report(
    config_path: &Path,
    config: &ServiceConfig,
    api_key_set: bool,
) -> anyhow::Result<serde_json::Value> {
    Ok(json!({
        "config_file": config_path.display().to_string(),
        "config_file_found": config_path.exists(),
        "api_key": {
            "variable": API_KEY_ENV,
            "set": api_key_set,
        },
        "config": serde_json::to_value(config)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_redacts_key_and_shows_defaults() {
        let report = build_report(
            Path::new("/nonexistent/parley.toml"),
            &ServiceConfig::default(),
            true,
        )
        .unwrap();

        assert_eq!(report["config_file_found"], false);
        assert_eq!(report["api_key"]["variable"], "GOOGLE_API_KEY");
        assert_eq!(report["api_key"]["set"], true);
        assert_eq!(report["config"]["model"]["name"], "gemini-2.0-flash");
        assert_eq!(report["config"]["server"]["log_tail_lines"], 100);
    }
}
