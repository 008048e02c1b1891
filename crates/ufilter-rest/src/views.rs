//! The view side of view-level filtering.
//!
//! A view opts into filtering by implementing [`FilterView`] and returning a
//! [`ViewFilterConfig`]: either an explicit filter set class, or a selection of
//! model fields to synthesize one from.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use ufilter_db::QuerySet;
use ufilter_filters::{FieldSelection, FilterSetClass};
use ufilter_http::HttpRequest;

use crate::backend::{FilterBackend, RestFilterBackend};
use crate::exceptions::ApiError;

/// Upcast to `Any`, so a `&dyn FilterView` can be placed in a filter context
/// and downcast by whoever reads it.
pub trait AsAny {
    fn as_any(&self) -> &(dyn Any + Send + Sync);
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &(dyn Any + Send + Sync) {
        self
    }
}

/// How a view wants its queryset filtered.
///
/// When `filter_class` is set it wins, whatever `filter_fields` says.
#[derive(Clone, Default)]
pub struct ViewFilterConfig {
    pub filter_class: Option<Arc<dyn FilterSetClass>>,
    pub filter_fields: Option<FieldSelection>,
}

impl ViewFilterConfig {
    /// A configuration with neither attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the explicit filter set class.
    #[must_use]
    pub fn filter_class(mut self, class: Arc<dyn FilterSetClass>) -> Self {
        self.filter_class = Some(class);
        self
    }

    /// Sets the field selection.
    #[must_use]
    pub fn filter_fields(mut self, fields: FieldSelection) -> Self {
        self.filter_fields = Some(fields);
        self
    }

    /// Returns `true` if either attribute is set.
    pub const fn is_configured(&self) -> bool {
        self.filter_class.is_some() || self.filter_fields.is_some()
    }
}

impl fmt::Debug for ViewFilterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewFilterConfig")
            .field(
                "filter_class",
                &self.filter_class.as_ref().map(|c| c.model().label()),
            )
            .field("filter_fields", &self.filter_fields)
            .finish()
    }
}

/// A view that can be filtered.
///
/// # Examples
///
/// ```
/// use ufilter_filters::FieldSelection;
/// use ufilter_rest::{FilterView, ViewFilterConfig};
///
/// struct PlaceList;
///
/// impl FilterView for PlaceList {
///     fn filter_config(&self) -> ViewFilterConfig {
///         ViewFilterConfig::new().filter_fields(FieldSelection::only(["name"]))
///     }
/// }
///
/// assert!(PlaceList.filter_config().is_configured());
/// ```
pub trait FilterView: AsAny + Send + Sync {
    /// Returns this view's filtering configuration.
    fn filter_config(&self) -> ViewFilterConfig;

    /// A name for diagnostics. Defaults to the type name.
    fn view_name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A list-style API view that runs its queryset through filter backends.
pub trait GenericApiView: FilterView {
    /// The backends applied by [`filter_queryset`](Self::filter_queryset), in order.
    fn filter_backends(&self) -> Vec<Arc<dyn FilterBackend>> {
        vec![Arc::new(RestFilterBackend::new())]
    }

    /// Threads `queryset` through every backend, stopping at the first error.
    fn filter_queryset(
        &self,
        request: &HttpRequest,
        queryset: Option<QuerySet>,
    ) -> Result<Option<QuerySet>, ApiError>
    where
        Self: Sized,
    {
        self.filter_backends()
            .iter()
            .try_fold(queryset, |queryset, backend| {
                backend.filter_queryset(request, queryset, self)
            })
    }
}
