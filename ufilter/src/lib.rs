//! # ufilter
//!
//! URL query filtering for REST APIs.
//!
//! This is the meta-crate that re-exports the sub-crates. Depend on `ufilter`
//! for everything, or on individual crates for finer-grained control.
//!
//! ```
//! use ufilter::filters::FieldSelection;
//! use ufilter::rest::{FilterView, ViewFilterConfig};
//!
//! struct PlaceList;
//!
//! impl FilterView for PlaceList {
//!     fn filter_config(&self) -> ViewFilterConfig {
//!         ViewFilterConfig::new().filter_fields(FieldSelection::All)
//!     }
//! }
//! ```

/// Settings, logging setup, and error types.
pub use ufilter_core as core;

/// Models, field definitions, and the lazy `QuerySet`.
pub use ufilter_db as db;

/// Requests, responses, and `QueryDict`.
#[cfg(feature = "http")]
pub use ufilter_http as http;

/// Filters, filter sets, and model filter set generation.
#[cfg(feature = "filters")]
pub use ufilter_filters as filters;

/// The REST filter backend and API errors.
#[cfg(feature = "rest")]
pub use ufilter_rest as rest;

/// Test fixtures and a request factory.
#[cfg(feature = "testing")]
pub use ufilter_test as test;

pub use axum;
pub use serde;
pub use serde_json;
pub use tracing;
pub use tracing_subscriber;
