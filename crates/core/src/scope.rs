//! Analysis Scope
//!
//! Selects which prefix of the conversation sequence is analyzed. Scope always
//! takes a prefix in input order, never a sample.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Rule selecting the analyzed prefix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", content = "value", rename_all = "lowercase")]
pub enum ScopeSelection {
    /// Every conversation.
    #[default]
    All,
    /// The first N conversations.
    Count(usize),
    /// The first P percent of conversations, rounded up.
    Percent(f64),
}

impl ScopeSelection {
    /// Create a percent scope. `percent` must be within `0..=100`.
    pub fn percent(percent: f64) -> CoreResult<Self> {
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(CoreError::validation(format!(
                "percent scope must be between 0 and 100, got {}",
                percent
            )));
        }
        Ok(Self::Percent(percent))
    }

    /// Parse a scope from a mode name and an optional value.
    ///
    /// `all` ignores the value; `count` and `percent` require one.
    pub fn parse(mode: &str, value: Option<f64>) -> CoreResult<Self> {
        match mode.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "count" => {
                let value = value.ok_or_else(|| CoreError::validation("count scope requires a value"))?;
                if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
                    return Err(CoreError::validation(format!(
                        "count scope must be a non-negative integer, got {}",
                        value
                    )));
                }
                Ok(Self::Count(value as usize))
            }
            "percent" => {
                let value =
                    value.ok_or_else(|| CoreError::validation("percent scope requires a value"))?;
                Self::percent(value)
            }
            other => Err(CoreError::parse(format!(
                "unknown scope mode '{}', expected all, count, or percent",
                other
            ))),
        }
    }

    /// Resolve the scope into a concrete prefix length for `total` records.
    pub fn resolve(&self, total: usize) -> usize {
        match *self {
            ScopeSelection::All => total,
            ScopeSelection::Count(n) => n.min(total),
            ScopeSelection::Percent(p) => {
                // p * total / 100 keeps whole-number results exact (10% of 30 is 3, not 3.0000000000000004)
                let target = (p * total as f64 / 100.0).ceil();
                if target <= 0.0 {
                    0
                } else {
                    (target as usize).min(total)
                }
            }
        }
    }
}

impl std::fmt::Display for ScopeSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeSelection::All => write!(f, "all"),
            ScopeSelection::Count(n) => write!(f, "first {}", n),
            ScopeSelection::Percent(p) => write!(f, "first {}%", p),
        }
    }
}
