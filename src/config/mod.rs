//! Configuration module
//!
//! Handles user configuration (`<config dir>/treemux/config.toml`) layered
//! with environment overrides.

mod settings;

pub use settings::*;
