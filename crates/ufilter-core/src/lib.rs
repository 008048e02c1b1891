//! # ufilter-core
//!
//! Core types, settings, and error types for ufilter-rs.
//! This crate has no framework dependencies and is the foundation for all other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`utils`] - Utility types (`MultiValueDict`)
//! - [`settings`] - Filtering and REST settings with a global container
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod utils;

// Re-export the most commonly used types at the crate root.
pub use error::{UfilterError, UfilterResult, ValidationError, NON_FIELD_ERRORS};
pub use settings::{FilterSettings, Settings, StrictMode, SETTINGS};
