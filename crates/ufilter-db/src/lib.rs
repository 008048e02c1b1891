//! # ufilter-db
//!
//! Data layer for ufilter-rs. Provides the [`Model`](model::Model) trait and
//! [`ModelMeta`](model::ModelMeta) describing filterable entities, and a lazy
//! [`QuerySet`](query::QuerySet) that filter sets narrow down with
//! [`Q`](query::Q) objects.
//!
//! A `QuerySet` never touches a database here: it only accumulates the
//! conditions a backend would later compile and run.
//!
//! ## Module Overview
//!
//! - [`model`] - The [`Model`](model::Model) trait, [`ModelMeta`](model::ModelMeta) and reverse relations
//! - [`fields`] - Field definitions ([`FieldDef`](fields::FieldDef)) and types
//! - [`value`] - The backend-agnostic [`Value`](value::Value) enum
//! - [`query`] - Lookups, Q objects, `QuerySet` and `Manager`

// struct_excessive_bools: FieldDef carries the usual column flags
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::return_self_not_must_use)]

pub mod fields;
pub mod model;
pub mod query;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use fields::{FieldDef, FieldType, OnDelete};
pub use model::{Model, ModelMeta, RelatedObject, RelationKind};
pub use query::{Lookup, Manager, QuerySet, Q};
pub use value::Value;
