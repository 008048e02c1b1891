//! Model trait and metadata.
//!
//! The [`Model`] trait ties a Rust type to its static [`ModelMeta`], which lists
//! the concrete fields of the model and the reverse relations other models
//! declare against it. Filter sets are synthesized from this metadata.

use ufilter_core::{UfilterError, UfilterResult};

use crate::fields::FieldDef;
use crate::query::Manager;

/// The core trait for all models.
///
/// # Examples
///
/// ```
/// use std::sync::LazyLock;
/// use ufilter_db::fields::{FieldDef, FieldType};
/// use ufilter_db::model::{Model, ModelMeta};
///
/// struct Article;
///
/// impl Model for Article {
///     fn meta() -> &'static ModelMeta {
///         static META: LazyLock<ModelMeta> = LazyLock::new(|| {
///             ModelMeta::new("blog", "article")
///                 .field(FieldDef::new("id", FieldType::BigAutoField).primary_key())
///                 .field(FieldDef::new("title", FieldType::CharField))
///         });
///         &META
///     }
/// }
///
/// assert_eq!(Article::app_label(), "blog");
/// assert_eq!(Article::objects().all().model().label(), "blog.article");
/// ```
pub trait Model: Send + Sync + 'static {
    /// Returns the static metadata for this model type.
    fn meta() -> &'static ModelMeta;

    /// Returns the application label this model belongs to.
    fn app_label() -> &'static str {
        Self::meta().app_label
    }

    /// Returns the default manager for this model.
    fn objects() -> Manager<Self>
    where
        Self: Sized,
    {
        Manager::new()
    }
}

/// The cardinality of a relation, seen from the model that declares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RelationKind {
    /// Declared by a `OneToOneField`.
    OneToOne,
    /// Declared by a `ForeignKey`.
    ManyToOne,
    /// Declared by a `ManyToManyField`.
    ManyToMany,
}

/// A reverse relation: another model points at this one.
///
/// For `Restaurant.place = OneToOneField(Place)`, `Place` carries a
/// `RelatedObject` named `restaurant`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedObject {
    /// The accessor name on this model (e.g. "restaurant", "waiter_set").
    pub name: &'static str,
    /// Label of the model that declares the relation.
    pub related_model: &'static str,
    /// Name of the declaring field on the related model.
    pub field_name: &'static str,
    /// Kind of the declaring field.
    pub kind: RelationKind,
}

impl RelatedObject {
    /// Creates a reverse relation entry.
    pub const fn new(
        name: &'static str,
        related_model: &'static str,
        field_name: &'static str,
        kind: RelationKind,
    ) -> Self {
        Self {
            name,
            related_model,
            field_name,
            kind,
        }
    }

    /// Returns `true` if the reverse side yields many objects.
    pub const fn is_multiple(&self) -> bool {
        !matches!(self.kind, RelationKind::OneToOne)
    }
}

/// A field of a model as seen by filtering: concrete or reverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetaField<'a> {
    /// A column declared on the model itself.
    Concrete(&'a FieldDef),
    /// A relation declared on another model that points here.
    Reverse(&'a RelatedObject),
}

impl MetaField<'_> {
    /// Returns the name of this field.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Concrete(f) => f.name,
            Self::Reverse(r) => r.name,
        }
    }

    /// Returns `true` for relations in either direction.
    pub const fn is_relation(&self) -> bool {
        match self {
            Self::Concrete(f) => f.is_relation(),
            Self::Reverse(_) => true,
        }
    }
}

/// Metadata about a model.
///
/// Two `ModelMeta`s are equal when they describe the same model label.
#[derive(Debug, Clone)]
pub struct ModelMeta {
    /// The application label (e.g., "one_to_one").
    pub app_label: &'static str,
    /// The model name in lowercase (e.g., "place").
    pub model_name: &'static str,
    /// Field definitions, in declaration order.
    pub fields: Vec<FieldDef>,
    /// Reverse relations from other models, in registration order.
    pub related_objects: Vec<RelatedObject>,
}

impl ModelMeta {
    /// Creates metadata with no fields.
    pub const fn new(app_label: &'static str, model_name: &'static str) -> Self {
        Self {
            app_label,
            model_name,
            fields: Vec::new(),
            related_objects: Vec::new(),
        }
    }

    /// Appends a concrete field.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends a reverse relation.
    #[must_use]
    pub fn related_object(mut self, related: RelatedObject) -> Self {
        self.related_objects.push(related);
        self
    }

    /// Returns the `app_label.model_name` label.
    pub fn label(&self) -> String {
        format!("{}.{}", self.app_label, self.model_name)
    }

    /// Returns the concrete field with the given name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the reverse relation with the given accessor name.
    pub fn get_related_object(&self, name: &str) -> Option<&RelatedObject> {
        self.related_objects.iter().find(|r| r.name == name)
    }

    /// Returns the primary key field, if one is declared.
    pub fn pk_field(&self) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.primary_key)
    }

    /// Returns every field, concrete fields first, then reverse relations.
    pub fn get_fields(&self) -> Vec<MetaField<'_>> {
        self.fields
            .iter()
            .map(MetaField::Concrete)
            .chain(self.related_objects.iter().map(MetaField::Reverse))
            .collect()
    }

    /// Looks up a concrete field or reverse relation by name.
    pub fn lookup_field(&self, name: &str) -> UfilterResult<MetaField<'_>> {
        self.get_field(name)
            .map(MetaField::Concrete)
            .or_else(|| self.get_related_object(name).map(MetaField::Reverse))
            .ok_or_else(|| UfilterError::FieldDoesNotExist {
                model: self.label(),
                field: name.to_string(),
            })
    }

    /// Returns the names of every field, in [`get_fields`](Self::get_fields) order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.get_fields().iter().map(MetaField::name).collect()
    }
}

impl PartialEq for ModelMeta {
    fn eq(&self, other: &Self) -> bool {
        self.app_label == other.app_label && self.model_name == other.model_name
    }
}

impl Eq for ModelMeta {}
