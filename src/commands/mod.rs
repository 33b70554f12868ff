//! Commands
//!
//! CLI command handlers. Each handler takes its parsed arguments plus the
//! loaded `AppConfig` and drives the services layer.

pub mod analyze;
pub mod config;
pub mod overview;

use clap::Args;
use usecase_mapper_core::ScopeSelection;
use usecase_mapper_llm::ProviderType;

use crate::models::settings::SettingsUpdate;
use crate::utils::error::AppResult;

pub use analyze::{AnalyzeArgs, ProgressObserver};
pub use config::show_config;
pub use overview::OverviewArgs;

/// Which conversations to include
#[derive(Debug, Clone, Args)]
pub struct ScopeArgs {
    /// Scope mode: all, count, or percent
    #[arg(long = "scope", default_value = "all")]
    pub mode: String,

    /// Record count (count mode) or percentage 0-100 (percent mode)
    #[arg(long = "scope-value")]
    pub value: Option<f64>,
}

impl ScopeArgs {
    pub fn selection(&self) -> AppResult<ScopeSelection> {
        Ok(ScopeSelection::parse(&self.mode, self.value)?)
    }
}

/// Engine and provider overrides layered over the config file
#[derive(Debug, Clone, Default, Args)]
pub struct EngineArgs {
    /// Remote model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Conversations per remote call
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Requests-per-minute ceiling
    #[arg(long)]
    pub rpm: Option<f64>,

    /// Provider: gemini or openai
    #[arg(long)]
    pub provider: Option<ProviderType>,

    /// Provider endpoint override
    #[arg(long)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// API key (overrides config and environment)
    #[arg(long)]
    pub api_key: Option<String>,
}

impl EngineArgs {
    pub fn to_update(&self) -> SettingsUpdate {
        SettingsUpdate {
            model: self.model.clone(),
            batch_size: self.batch_size,
            rpm: self.rpm,
            provider: self.provider,
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            api_key: self.api_key.clone(),
        }
    }
}
