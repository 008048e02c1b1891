//! Filter sets synthesized from model metadata.
//!
//! [`ModelFilterSet`] generates one [`Filter`] per selected model field,
//! reverse relations included, the same way model-backed forms generate form
//! fields from a model.

use serde::{Deserialize, Serialize};
use tracing::warn;
use ufilter_core::StrictMode;
use ufilter_db::model::ModelMeta;

use crate::filter::Filter;
use crate::filterset::FilterSetClass;

/// The value that selects every field.
pub const ALL_FIELDS: &str = "__all__";

/// Which model fields get a filter.
///
/// Serializes as `"__all__"` or as a list of names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSelection", into = "RawSelection")]
pub enum FieldSelection {
    /// Every field of the model, including reverse relations.
    All,
    /// Only the named fields, in this order.
    Only(Vec<String>),
}

impl FieldSelection {
    /// Selects the given field names.
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(names.into_iter().map(Into::into).collect())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawSelection {
    Sentinel(String),
    Names(Vec<String>),
}

impl TryFrom<RawSelection> for FieldSelection {
    type Error = String;

    fn try_from(raw: RawSelection) -> Result<Self, Self::Error> {
        match raw {
            RawSelection::Sentinel(s) if s == ALL_FIELDS => Ok(Self::All),
            RawSelection::Sentinel(s) => Err(format!(
                "expected \"{ALL_FIELDS}\" or a list of field names, got \"{s}\""
            )),
            RawSelection::Names(names) => Ok(Self::Only(names)),
        }
    }
}

impl From<FieldSelection> for RawSelection {
    fn from(selection: FieldSelection) -> Self {
        match selection {
            FieldSelection::All => Self::Sentinel(ALL_FIELDS.to_string()),
            FieldSelection::Only(names) => Self::Names(names),
        }
    }
}

/// A filter set generated from a model and a field selection.
///
/// Names in the selection that the model does not have are skipped with a
/// warning.
///
/// # Examples
///
/// ```
/// use std::sync::LazyLock;
/// use ufilter_db::fields::{FieldDef, FieldType};
/// use ufilter_db::model::{Model, ModelMeta};
/// use ufilter_filters::{FieldSelection, FilterSetClass, ModelFilterSet};
///
/// struct Tag;
///
/// impl Model for Tag {
///     fn meta() -> &'static ModelMeta {
///         static META: LazyLock<ModelMeta> = LazyLock::new(|| {
///             ModelMeta::new("blog", "tag")
///                 .field(FieldDef::new("id", FieldType::AutoField).primary_key())
///                 .field(FieldDef::new("label", FieldType::SlugField))
///         });
///         &META
///     }
/// }
///
/// let all = ModelFilterSet::new(Tag::meta(), FieldSelection::All);
/// assert_eq!(all.declared_fields(), vec!["id", "label"]);
///
/// let only = ModelFilterSet::new(Tag::meta(), FieldSelection::only(["label"]));
/// assert_eq!(only.declared_fields(), vec!["label"]);
/// ```
#[derive(Debug, Clone)]
pub struct ModelFilterSet {
    model: &'static ModelMeta,
    fields: FieldSelection,
    exclude: Vec<String>,
    strict_mode: Option<StrictMode>,
    filters: Vec<Filter>,
}

impl ModelFilterSet {
    /// Generates filters for the selected fields of `model`.
    pub fn new(model: &'static ModelMeta, fields: FieldSelection) -> Self {
        let mut filterset = Self {
            model,
            fields,
            exclude: Vec::new(),
            strict_mode: None,
            filters: Vec::new(),
        };
        filterset.generate_filters();
        filterset
    }

    /// Drops the named fields from the generated filters.
    #[must_use]
    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = names.into_iter().map(Into::into).collect();
        self.generate_filters();
        self
    }

    /// Overrides the configured strict mode.
    #[must_use]
    pub const fn with_strict_mode(mut self, mode: StrictMode) -> Self {
        self.strict_mode = Some(mode);
        self
    }

    /// Returns the field selection this filter set was generated from.
    pub const fn fields(&self) -> &FieldSelection {
        &self.fields
    }

    fn generate_filters(&mut self) {
        let model = self.model;
        let selected: Vec<Filter> = match &self.fields {
            FieldSelection::All => model
                .get_fields()
                .into_iter()
                .map(Filter::for_meta_field)
                .collect(),
            FieldSelection::Only(names) => names
                .iter()
                .filter_map(|name| match model.lookup_field(name) {
                    Ok(field) => Some(Filter::for_meta_field(field)),
                    Err(error) => {
                        warn!(%error, "skipping unknown filter field");
                        None
                    }
                })
                .collect(),
        };
        self.filters = selected
            .into_iter()
            .filter(|f| !self.exclude.contains(&f.name))
            .collect();
    }
}

impl FilterSetClass for ModelFilterSet {
    fn model(&self) -> &'static ModelMeta {
        self.model
    }

    fn filters(&self) -> &[Filter] {
        &self.filters
    }

    fn strict_mode(&self) -> StrictMode {
        self.strict_mode
            .unwrap_or_else(|| ufilter_core::SETTINGS.get_or_default().filters.default_strict_mode)
    }
}
