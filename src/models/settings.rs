//! Settings Models
//!
//! Application configuration loaded from TOML, CLI overrides, and credential
//! resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use usecase_mapper_core::{
    Credential, EngineSettings, DEFAULT_BATCH_SIZE, DEFAULT_MODEL, DEFAULT_RPM,
};
use usecase_mapper_llm::{ProviderConfig, ProviderType};

use crate::utils::error::{AppError, AppResult};
use crate::utils::paths;

/// Environment variables consulted for a credential, in order.
pub const CREDENTIAL_ENV_VARS: &[&str] = &["API_KEY", "GEMINI_API_KEY"];
/// Additional variable consulted when the provider is OpenAI.
pub const OPENAI_CREDENTIAL_ENV_VAR: &str = "OPENAI_API_KEY";

/// `[engine]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    /// Remote model identifier
    pub model: String,
    /// Records per remote call
    pub batch_size: usize,
    /// Requests-per-minute ceiling
    pub rpm: f64,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            rpm: DEFAULT_RPM,
        }
    }
}

/// `[provider]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSection {
    /// "gemini" or "openai"
    pub kind: ProviderType,
    /// Endpoint override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Overall request timeout in seconds
    pub timeout_secs: u64,
    /// Sampling temperature override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for ProviderSection {
    fn default() -> Self {
        let defaults = ProviderConfig::default();
        Self {
            kind: defaults.provider,
            base_url: defaults.base_url,
            timeout_secs: defaults.timeout_secs,
            temperature: defaults.temperature,
        }
    }
}

/// Application configuration stored in config.toml
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// API key; prefer the environment over storing it here
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub engine: EngineSection,
    pub provider: ProviderSection,
}

/// Settings overrides from the command line (partial update)
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub model: Option<String>,
    pub batch_size: Option<usize>,
    pub rpm: Option<f64>,
    pub provider: Option<ProviderType>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub api_key: Option<String>,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the per-user config file is
    /// read when present, otherwise defaults apply.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                Self::load_file(path)
            }
            None => match paths::config_path() {
                Ok(default_path) if default_path.exists() => Self::load_file(&default_path),
                _ => {
                    debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    fn load_file(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(model) = update.model {
            self.engine.model = model;
        }
        if let Some(batch_size) = update.batch_size {
            self.engine.batch_size = batch_size;
        }
        if let Some(rpm) = update.rpm {
            self.engine.rpm = rpm;
        }
        if let Some(provider) = update.provider {
            self.provider.kind = provider;
        }
        if let Some(base_url) = update.base_url {
            self.provider.base_url = Some(base_url);
        }
        if let Some(timeout_secs) = update.timeout_secs {
            self.provider.timeout_secs = timeout_secs;
        }
        if let Some(api_key) = update.api_key {
            self.api_key = Some(api_key);
        }
    }

    /// Validated engine settings. Non-positive batch size or rpm is an error.
    pub fn engine_settings(&self) -> AppResult<EngineSettings> {
        Ok(EngineSettings::new(
            self.engine.model.clone(),
            self.engine.batch_size,
            self.engine.rpm,
        )?)
    }

    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            provider: self.provider.kind,
            base_url: self.provider.base_url.clone(),
            timeout_secs: self.provider.timeout_secs,
            temperature: self.provider.temperature,
        }
    }

    /// Resolve the credential from the process environment.
    pub fn resolve_credential(&self) -> Option<Credential> {
        self.resolve_credential_with(|name| std::env::var(name).ok())
    }

    /// Resolve the credential: configured key (CLI or file) wins over the
    /// first non-blank environment variable.
    pub fn resolve_credential_with<F>(&self, lookup: F) -> Option<Credential>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut names: Vec<&str> = CREDENTIAL_ENV_VARS.to_vec();
        if self.provider.kind == ProviderType::OpenAI {
            names.push(OPENAI_CREDENTIAL_ENV_VAR);
        }
        let ambient = names
            .iter()
            .filter_map(|name| lookup(*name))
            .find(|value| !value.trim().is_empty());

        Credential::resolve(self.api_key.as_deref(), ambient.as_deref())
    }
}
