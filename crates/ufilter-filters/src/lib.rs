//! # ufilter-filters
//!
//! Filter sets bind named [`Filter`]s to a model and apply the matching URL
//! query parameters to a lazy [`QuerySet`](ufilter_db::QuerySet).
//!
//! ## Modules
//!
//! - [`lookup_type`] - Lookup names accepted after the `__` separator
//! - [`filter`] - A single filter and raw-value coercion
//! - [`context`] - The type-erased evaluation context
//! - [`filterset`] - The [`FilterSet`] and [`FilterSetClass`] traits, and [`BoundFilterSet`]
//! - [`model_filterset`] - Filter sets synthesized from model metadata

pub mod context;
pub mod filter;
pub mod filterset;
pub mod lookup_type;
pub mod model_filterset;

pub use context::FilterContext;
pub use filter::{Filter, FilterKind};
pub use filterset::{BoundFilterSet, FilterSet, FilterSetClass};
pub use lookup_type::LookupType;
pub use model_filterset::{FieldSelection, ModelFilterSet};
pub use ufilter_core::StrictMode;
