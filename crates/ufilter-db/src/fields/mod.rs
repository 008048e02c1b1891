//! Field definitions and types for models.
//!
//! This module provides the [`FieldDef`] struct and [`FieldType`] enum that
//! describe model fields. Filter sets derive their filters from these.

pub mod types;

pub use types::{FieldDef, FieldType, OnDelete};
