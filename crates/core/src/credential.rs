//! API Credential
//!
//! Opaque API key carried to the remote model. The value never appears in
//! `Debug` output.

/// An API credential. Construction rejects blank keys.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a key. Returns `None` for empty or whitespace-only input.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Merge an explicit override with an ambient default. The override wins
    /// whenever it is non-blank.
    pub fn resolve(override_key: Option<&str>, ambient_key: Option<&str>) -> Option<Self> {
        override_key
            .and_then(Credential::new)
            .or_else(|| ambient_key.and_then(Credential::new))
    }

    /// The raw key, for use in request headers only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credential(***)")
    }
}
