//! Filter set traits and the default query-parameter engine.
//!
//! A [`FilterSetClass`] is the long-lived description of a filter set: a
//! model plus an ordered list of [`Filter`]s. [`FilterSetClass::build`] binds
//! it to a [`FilterContext`] and the request's query parameters, producing a
//! [`FilterSet`] whose [`filter`](FilterSet::filter) narrows a queryset.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, trace};
use ufilter_core::{StrictMode, ValidationError, SETTINGS};
use ufilter_db::model::ModelMeta;
use ufilter_db::QuerySet;
use ufilter_http::QueryDict;

use crate::context::FilterContext;
use crate::filter::Filter;
use crate::lookup_type::LookupType;

/// A filter set bound to a context and a set of query parameters.
pub trait FilterSet {
    /// Applies the bound parameters to `queryset`.
    ///
    /// Invalid parameters are handled according to the strict mode; under
    /// [`StrictMode::Fail`] they come back as a `ValidationError` keyed by
    /// query parameter.
    fn filter(&self, queryset: QuerySet) -> Result<QuerySet, ValidationError>;

    /// Returns the evaluation context this filter set was built with.
    fn context(&self) -> &FilterContext<'_>;

    /// Returns the query parameters this filter set was built with.
    fn data(&self) -> &QueryDict;
}

/// The declaration of a filter set: which model, which filters.
///
/// Implementations are shared (`Arc<dyn FilterSetClass>`) between requests.
pub trait FilterSetClass: Send + Sync + fmt::Debug {
    /// The model this filter set targets.
    fn model(&self) -> &'static ModelMeta;

    /// The filters, in declaration order.
    fn filters(&self) -> &[Filter];

    /// Names of the declared filters, in declaration order.
    fn declared_fields(&self) -> Vec<&str> {
        self.filters().iter().map(|f| f.name.as_str()).collect()
    }

    /// Returns the filter with the given name.
    fn get_filter(&self, name: &str) -> Option<&Filter> {
        self.filters().iter().find(|f| f.name == name)
    }

    /// How invalid parameters are treated. Defaults to the configured mode.
    fn strict_mode(&self) -> StrictMode {
        SETTINGS.get_or_default().filters.default_strict_mode
    }

    /// Binds this filter set to a context and query parameters.
    fn build<'a>(&'a self, context: FilterContext<'a>, data: &'a QueryDict) -> Box<dyn FilterSet + 'a> {
        Box::new(BoundFilterSet::new(
            self.model(),
            self.filters(),
            self.strict_mode(),
            context,
            data,
        ))
    }
}

/// The default [`FilterSet`]: maps query parameters onto declared filters.
///
/// A parameter applies when its key is a filter name (exact lookup) or a
/// filter name, the lookup separator, and a lookup name. Other parameters
/// (pagination, ordering, ...) are ignored. Empty values are skipped.
pub struct BoundFilterSet<'a> {
    model: &'static ModelMeta,
    filters: &'a [Filter],
    strict_mode: StrictMode,
    context: FilterContext<'a>,
    data: &'a QueryDict,
}

type Resolved<'a> = Result<(&'a Filter, LookupType), Vec<String>>;

impl<'a> BoundFilterSet<'a> {
    /// Creates a bound filter set.
    pub const fn new(
        model: &'static ModelMeta,
        filters: &'a [Filter],
        strict_mode: StrictMode,
        context: FilterContext<'a>,
        data: &'a QueryDict,
    ) -> Self {
        Self {
            model,
            filters,
            strict_mode,
            context,
            data,
        }
    }

    /// Returns the model this filter set targets.
    pub const fn model(&self) -> &'static ModelMeta {
        self.model
    }

    /// Returns the strict mode in effect.
    pub const fn strict_mode(&self) -> StrictMode {
        self.strict_mode
    }

    fn find(&self, name: &str) -> Option<&'a Filter> {
        self.filters.iter().find(|f| f.name == name)
    }

    /// Maps a parameter key to a filter and lookup. `None` when the key names
    /// no filter at all.
    fn resolve(&self, key: &str, separator: &str) -> Option<Resolved<'a>> {
        if let Some(filter) = self.find(key) {
            return Some(Ok((filter, LookupType::Exact)));
        }
        let (name, suffix) = key.rsplit_once(separator)?;
        let filter = self.find(name)?;
        Some(
            suffix
                .parse::<LookupType>()
                .map(|lookup| (filter, lookup))
                .map_err(|_| vec![format!("Lookup '{suffix}' is not supported for this field.")]),
        )
    }
}

impl fmt::Debug for BoundFilterSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundFilterSet")
            .field("model", &self.model.label())
            .field("filters", &self.filters.len())
            .field("strict_mode", &self.strict_mode)
            .field("data", &self.data.urlencode())
            .finish_non_exhaustive()
    }
}

impl FilterSet for BoundFilterSet<'_> {
    fn filter(&self, mut queryset: QuerySet) -> Result<QuerySet, ValidationError> {
        let settings = SETTINGS.get_or_default();
        let lookup_sep = settings.filters.lookup_separator.as_str();
        let list_sep = settings.filters.list_separator.as_str();
        let mut errors: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for (key, values) in self.data.items() {
            let Some(resolved) = self.resolve(key, lookup_sep) else {
                trace!(param = key, "ignoring parameter that names no filter");
                continue;
            };

            let q = resolved.and_then(|(filter, lookup)| {
                let raw = if lookup == LookupType::In {
                    values.join(list_sep)
                } else {
                    values.last().cloned().unwrap_or_default()
                };
                if raw.trim().is_empty() {
                    return Ok(None);
                }
                filter.to_q(lookup, &raw, list_sep).map(Some)
            });

            match q {
                Ok(Some(q)) => queryset = queryset.filter(q),
                Ok(None) => trace!(param = key, "skipping empty filter value"),
                Err(messages) => match self.strict_mode {
                    StrictMode::Drop => {
                        debug!(param = key, ?messages, "dropping invalid filter parameter");
                    }
                    StrictMode::Empty => {
                        debug!(param = key, ?messages, "invalid filter parameter, emptying queryset");
                        return Ok(queryset.none());
                    }
                    StrictMode::Fail => {
                        errors.insert(key.to_string(), messages);
                    }
                },
            }
        }

        if errors.is_empty() {
            Ok(queryset)
        } else {
            debug!(params = ?errors.keys().collect::<Vec<_>>(), "rejecting invalid filter parameters");
            Err(ValidationError::from_messages(errors))
        }
    }

    fn context(&self) -> &FilterContext<'_> {
        &self.context
    }

    fn data(&self) -> &QueryDict {
        self.data
    }
}
