//! Query building.
//!
//! - [`lookups`] - Q objects and lookup types for filtering
//! - [`queryset`] - lazy `QuerySet` and the `Manager` entry point

pub mod lookups;
pub mod queryset;

pub use lookups::{Lookup, Q};
pub use queryset::{Manager, QuerySet};
