//! Config Command
//!
//! Shows the effective configuration after file loading and overrides.

use std::path::Path;

use crate::models::settings::AppConfig;
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths;

const REDACTED: &str = "********";

pub fn show_config(config: &AppConfig, source: Option<&Path>) -> AppResult<()> {
    let location = match source {
        Some(path) => path.display().to_string(),
        None => paths::config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "(none)".to_string()),
    };
    println!("# config file: {}", location);
    print!("{}", render(config)?);
    Ok(())
}

/// TOML rendering with the API key masked.
pub fn render(config: &AppConfig) -> AppResult<String> {
    let mut shown = config.clone();
    if shown.api_key.is_some() {
        shown.api_key = Some(REDACTED.to_string());
    }
    toml::to_string_pretty(&shown).map_err(|e| AppError::config(e.to_string()))
}
