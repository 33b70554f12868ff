//! Data Models
//!
//! Application-level configuration. Domain types live in `usecase-mapper-core`.

pub mod settings;

pub use settings::*;
