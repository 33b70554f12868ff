//! Cross-Platform Path Utilities
//!
//! Resolves the per-user configuration location
//! (`<config_dir>/usecase-mapper/config.toml`).

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Directory name under the platform config directory
pub const APP_DIR_NAME: &str = "usecase-mapper";

/// Get the platform configuration directory
pub fn config_dir() -> AppResult<PathBuf> {
    dirs::config_dir().ok_or_else(|| AppError::config("Could not determine config directory"))
}

/// Get the application directory (`<config_dir>/usecase-mapper/`)
pub fn app_config_dir() -> AppResult<PathBuf> {
    Ok(config_dir()?.join(APP_DIR_NAME))
}

/// Get the default config file path
pub fn config_path() -> AppResult<PathBuf> {
    Ok(app_config_dir()?.join("config.toml"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Ensure the parent directory of a file path exists
pub fn ensure_parent_dir(path: &Path) -> AppResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}
