//! The filter backend API views call to filter their querysets.
//!
//! [`RestFilterBackend`] resolves which filter set applies to a view, binds it
//! to the request and view, runs it over the queryset, and translates filter
//! validation failures into [`ApiError::ValidationError`].

use std::any::Any;
use std::sync::Arc;

use tracing::debug;
use ufilter_db::QuerySet;
use ufilter_filters::{FilterContext, FilterSetClass, ModelFilterSet};
use ufilter_http::HttpRequest;

use crate::exceptions::{ApiError, ErrorDetail};
use crate::views::FilterView;

/// A view-level queryset filter.
pub trait FilterBackend: Send + Sync {
    /// Filters `queryset` for `request` as configured by `view`.
    ///
    /// `None` means there is nothing to filter and passes through unchanged.
    fn filter_queryset(
        &self,
        request: &HttpRequest,
        queryset: Option<QuerySet>,
        view: &dyn FilterView,
    ) -> Result<Option<QuerySet>, ApiError>;
}

/// The filter backend driven by a view's [`ViewFilterConfig`](crate::ViewFilterConfig).
///
/// # Panics
///
/// [`filter_queryset`](FilterBackend::filter_queryset) panics when the view's
/// explicit filter set targets a different model than the queryset. That is a
/// configuration bug, not a client error.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestFilterBackend;

impl RestFilterBackend {
    pub const fn new() -> Self {
        Self
    }

    /// Returns the filter set class for `view`.
    ///
    /// An explicit `filter_class` is returned as is. Otherwise a
    /// [`ModelFilterSet`] is generated over the queryset's model from
    /// `filter_fields`, fresh on every call.
    pub fn get_filter_class(
        &self,
        view: &dyn FilterView,
        queryset: &QuerySet,
    ) -> Result<Arc<dyn FilterSetClass>, ApiError> {
        let config = view.filter_config();

        if let Some(filter_class) = config.filter_class {
            debug!(view = view.view_name(), model = %filter_class.model().label(), "using explicit filter class");
            return Ok(filter_class);
        }

        match config.filter_fields {
            Some(fields) => {
                debug!(
                    view = view.view_name(),
                    model = %queryset.model().label(),
                    ?fields,
                    "generating filter class from filter_fields"
                );
                Ok(Arc::new(ModelFilterSet::new(queryset.model(), fields)))
            }
            None => Err(ApiError::ImproperlyConfigured(format!(
                "{} must set either filter_class or filter_fields to use {}",
                view.view_name(),
                std::any::type_name::<Self>(),
            ))),
        }
    }

    /// Returns the context filter sets are built with: exactly `request` and
    /// `view`, bound to the given values.
    pub fn get_filter_context<'a>(
        &self,
        request: &'a (dyn Any + Send + Sync),
        view: &'a (dyn Any + Send + Sync),
    ) -> FilterContext<'a> {
        let mut context = FilterContext::new();
        context.insert("request", request);
        context.insert("view", view);
        context
    }
}

impl FilterBackend for RestFilterBackend {
    fn filter_queryset(
        &self,
        request: &HttpRequest,
        queryset: Option<QuerySet>,
        view: &dyn FilterView,
    ) -> Result<Option<QuerySet>, ApiError> {
        let Some(queryset) = queryset else {
            return Ok(None);
        };

        let filter_class = self.get_filter_class(view, &queryset)?;

        assert_eq!(
            filter_class.model(),
            queryset.model(),
            "FilterSet model {} does not match queryset model {}",
            filter_class.model().label(),
            queryset.model().label(),
        );

        let context = self.get_filter_context(request, view.as_any());
        let filterset = filter_class.build(context, request.query_params());
        let result = filterset.filter(queryset);

        result.map(Some).map_err(|error| {
            let detail = ErrorDetail::from_validation_error(&error);
            debug!(view = view.view_name(), fields = ?detail.fields().collect::<Vec<_>>(), "filter validation failed");
            ApiError::ValidationError(detail)
        })
    }
}
