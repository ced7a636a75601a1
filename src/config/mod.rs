//! Configuration module
//!
//! Handles user configuration (`config.toml` in the platform config
//! directory, overridable with `BRANCHKIT_*` environment variables).

mod settings;

pub use settings::*;
