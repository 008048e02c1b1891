//! # ufilter-rest
//!
//! Connects filter sets to API views. [`RestFilterBackend`] picks the filter
//! set a view is configured with, applies it to the view's queryset, and turns
//! filter validation failures into [`ApiError`]s that render as 400 responses.
//!
//! ## Modules
//!
//! - [`backend`] - The [`FilterBackend`] trait and [`RestFilterBackend`]
//! - [`views`] - View-side configuration ([`FilterView`], [`ViewFilterConfig`])
//! - [`exceptions`] - [`ApiError`], [`ErrorDetail`], and the exception handler

pub mod backend;
pub mod exceptions;
pub mod views;

pub use backend::{FilterBackend, RestFilterBackend};
pub use exceptions::{exception_handler, ApiError, ErrorDetail};
pub use views::{AsAny, FilterView, GenericApiView, ViewFilterConfig};
