//! QuerySet and Manager.
//!
//! A [`QuerySet`] is a lazy handle on the rows of one model. Filtering methods
//! only record conditions; nothing is evaluated here. The [`Manager`] is the
//! per-model entry point, reached through [`Model::objects`](crate::model::Model::objects).
//!
//! # Examples
//!
//! ```
//! use std::sync::LazyLock;
//! use ufilter_db::fields::{FieldDef, FieldType};
//! use ufilter_db::model::{Model, ModelMeta};
//! use ufilter_db::query::{Lookup, Q};
//! use ufilter_db::value::Value;
//!
//! struct Place;
//!
//! impl Model for Place {
//!     fn meta() -> &'static ModelMeta {
//!         static META: LazyLock<ModelMeta> = LazyLock::new(|| {
//!             ModelMeta::new("one_to_one", "place")
//!                 .field(FieldDef::new("name", FieldType::CharField))
//!         });
//!         &META
//!     }
//! }
//!
//! let qs = Place::objects()
//!     .all()
//!     .filter(Q::filter("name", Lookup::IContains("demon".into())));
//! assert!(qs.where_clause().is_some());
//! ```

use std::fmt;
use std::marker::PhantomData;

use super::lookups::Q;
use crate::model::{Model, ModelMeta};

/// The entry point for model-level query operations.
///
/// The `Manager` holds no query state; it creates fresh `QuerySet`s.
pub struct Manager<M: Model> {
    _phantom: PhantomData<M>,
}

impl<M: Model> fmt::Debug for Manager<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("model", &M::meta().label())
            .finish()
    }
}

impl<M: Model> Default for Manager<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> Manager<M> {
    /// Creates a new manager.
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }

    /// Returns a new `QuerySet` that returns all objects.
    pub fn all(&self) -> QuerySet {
        QuerySet::new(M::meta())
    }

    /// Returns a new `QuerySet` with the given filter applied.
    pub fn filter(&self, q: Q) -> QuerySet {
        self.all().filter(q)
    }

    /// Returns an empty `QuerySet` that matches nothing.
    pub fn none(&self) -> QuerySet {
        self.all().none()
    }
}

/// A lazy, composable query over one model.
///
/// All filtering methods consume `self` and return the narrowed queryset, so
/// the API chains and callers never observe partial state. Two querysets are
/// equal when they target the same model with the same conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySet {
    model: &'static ModelMeta,
    where_clause: Option<Q>,
    is_none: bool,
}

impl QuerySet {
    /// Creates a queryset over every row of `model`.
    pub const fn new(model: &'static ModelMeta) -> Self {
        Self {
            model,
            where_clause: None,
            is_none: false,
        }
    }

    /// Returns the metadata of the model this queryset targets.
    pub const fn model(&self) -> &'static ModelMeta {
        self.model
    }

    /// Returns the accumulated filter conditions.
    pub const fn where_clause(&self) -> Option<&Q> {
        self.where_clause.as_ref()
    }

    /// Returns `true` if this queryset can match nothing.
    pub const fn is_none(&self) -> bool {
        self.is_none
    }

    // ── Filtering methods (lazy) ─────────────────────────────────────

    /// Adds a filter condition, AND-ed with any existing ones.
    #[must_use]
    pub fn filter(mut self, q: Q) -> Self {
        if q.is_empty() {
            return self;
        }
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => existing & q,
            None => q,
        });
        self
    }

    /// Adds an exclusion condition (NOT).
    #[must_use]
    pub fn exclude(self, q: Q) -> Self {
        if q.is_empty() {
            return self;
        }
        self.filter(!q)
    }

    /// Returns all objects (identity operation for chaining).
    #[must_use]
    pub fn all(self) -> Self {
        self
    }

    /// Returns an empty queryset.
    #[must_use]
    pub fn none(mut self) -> Self {
        self.is_none = true;
        self
    }
}

impl fmt::Display for QuerySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<QuerySet {}", self.model.label())?;
        if self.is_none {
            write!(f, " none")?;
        } else if let Some(q) = &self.where_clause {
            write!(f, " where {} condition(s)", q.leaf_count())?;
        }
        write!(f, ">")
    }
}
