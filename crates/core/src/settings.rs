//! Engine Settings
//!
//! Validated analysis engine configuration and its builder.
//!
//! `EngineSettings` can only be obtained through validation, so a value in hand
//! always satisfies `batch_size >= 1` and `rpm > 0`. Non-positive values are
//! rejected rather than clamped.
//!
//! # Example
//! ```ignore
//! let settings = EngineSettingsBuilder::new()
//!     .model("gemini-3-flash-preview")
//!     .batch_size(40)
//!     .rpm(15.0)
//!     .build()?;
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Default remote model identifier.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
/// Default number of conversations per remote call.
pub const DEFAULT_BATCH_SIZE: usize = 40;
/// Default requests-per-minute ceiling.
pub const DEFAULT_RPM: f64 = 15.0;

/// Validated engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEngineSettings", rename_all = "camelCase")]
pub struct EngineSettings {
    model: String,
    batch_size: usize,
    rpm: f64,
}

impl EngineSettings {
    /// Validate and create engine settings.
    pub fn new(model: impl Into<String>, batch_size: usize, rpm: f64) -> CoreResult<Self> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(CoreError::validation("model cannot be empty"));
        }
        if batch_size == 0 {
            return Err(CoreError::validation("batch_size must be >= 1"));
        }
        if !rpm.is_finite() || rpm <= 0.0 {
            return Err(CoreError::validation(format!(
                "rpm must be a positive number, got {}",
                rpm
            )));
        }
        Ok(Self {
            model,
            batch_size,
            rpm,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn rpm(&self) -> f64 {
        self.rpm
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            rpm: DEFAULT_RPM,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEngineSettings {
    model: String,
    batch_size: usize,
    rpm: f64,
}

impl TryFrom<RawEngineSettings> for EngineSettings {
    type Error = CoreError;

    fn try_from(raw: RawEngineSettings) -> CoreResult<Self> {
        EngineSettings::new(raw.model, raw.batch_size, raw.rpm)
    }
}

// ============================================================================
// EngineSettingsBuilder
// ============================================================================

/// Builder for engine settings. Unset fields fall back to the defaults.
#[derive(Debug, Default)]
pub struct EngineSettingsBuilder {
    model: Option<String>,
    batch_size: Option<usize>,
    rpm: Option<f64>,
}

impl EngineSettingsBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the remote model identifier.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the number of conversations per remote call.
    pub fn batch_size(mut self, n: usize) -> Self {
        self.batch_size = Some(n);
        self
    }

    /// Set the requests-per-minute ceiling.
    pub fn rpm(mut self, rpm: f64) -> Self {
        self.rpm = Some(rpm);
        self
    }

    /// Build and validate the settings.
    pub fn build(self) -> CoreResult<EngineSettings> {
        EngineSettings::new(
            self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
            self.rpm.unwrap_or(DEFAULT_RPM),
        )
    }
}
