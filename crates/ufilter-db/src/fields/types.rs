//! Field type definitions for models.
//!
//! Each [`FieldType`] variant corresponds to a model field class, and
//! [`FieldDef`] captures the metadata about a single field that filtering
//! cares about.

/// The type of a model field.
///
/// Relational fields (`ForeignKey`, `OneToOneField`, `ManyToManyField`) carry
/// the label of the model they point to.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum FieldType {
    /// Auto-incrementing 32-bit integer primary key.
    AutoField,
    /// Auto-incrementing 64-bit integer primary key.
    BigAutoField,
    /// Variable-length string with a max length.
    CharField,
    /// Unlimited-length text.
    TextField,
    /// 32-bit signed integer.
    IntegerField,
    /// 64-bit signed integer.
    BigIntegerField,
    /// 16-bit signed integer.
    SmallIntegerField,
    /// 64-bit floating-point number.
    FloatField,
    /// Fixed-precision decimal number.
    DecimalField {
        /// Maximum total digits.
        max_digits: u32,
        /// Digits after the decimal point.
        decimal_places: u32,
    },
    /// Boolean (true/false).
    BooleanField,
    /// Date without time.
    DateField,
    /// Date and time.
    DateTimeField,
    /// Time without date.
    TimeField,
    /// UUID field.
    UuidField,
    /// JSON data.
    JsonField,
    /// Email address.
    EmailField,
    /// URL.
    UrlField,
    /// Slug (URL-friendly string).
    SlugField,
    /// Many-to-one relationship.
    ForeignKey {
        /// The target model label (e.g. "one_to_one.restaurant").
        to: String,
        /// Behavior when the referenced object is deleted.
        on_delete: OnDelete,
        /// The name used for the reverse relation.
        related_name: Option<String>,
    },
    /// One-to-one relationship (unique foreign key).
    OneToOneField {
        /// The target model label.
        to: String,
        /// Behavior when the referenced object is deleted.
        on_delete: OnDelete,
        /// The name used for the reverse relation.
        related_name: Option<String>,
    },
    /// Many-to-many relationship.
    ManyToManyField {
        /// The target model label.
        to: String,
        /// The name used for the reverse relation.
        related_name: Option<String>,
    },
}

impl FieldType {
    /// Returns the label of the related model for relational fields.
    pub fn related_model(&self) -> Option<&str> {
        match self {
            Self::ForeignKey { to, .. }
            | Self::OneToOneField { to, .. }
            | Self::ManyToManyField { to, .. } => Some(to),
            _ => None,
        }
    }
}

/// Behavior when a referenced object is deleted (ON DELETE action).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OnDelete {
    /// Delete all related objects (CASCADE).
    Cascade,
    /// Prevent deletion if related objects exist (PROTECT).
    Protect,
    /// Set the foreign key to NULL.
    SetNull,
    /// Take no action.
    DoNothing,
}

/// Definition of a model field.
///
/// Typically declared once per model inside its static [`ModelMeta`](crate::model::ModelMeta).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// The attribute name of this field.
    pub name: &'static str,
    /// The type of this field.
    pub field_type: FieldType,
    /// Whether this field is the primary key.
    pub primary_key: bool,
}

impl FieldDef {
    /// Creates a new, non-key `FieldDef`.
    pub const fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            primary_key: false,
        }
    }

    /// Marks this field as the primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Returns `true` if this field represents a relational field.
    pub const fn is_relation(&self) -> bool {
        matches!(
            self.field_type,
            FieldType::ForeignKey { .. }
                | FieldType::OneToOneField { .. }
                | FieldType::ManyToManyField { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_def_new_defaults() {
        let f = FieldDef::new("street_name", FieldType::CharField);
        assert_eq!(f.name, "street_name");
        assert!(!f.primary_key);
        assert!(FieldDef::new("id", FieldType::AutoField).primary_key().primary_key);
    }

    #[test]
    fn test_field_def_is_relation() {
        let fk = FieldDef::new(
            "restaurant",
            FieldType::ForeignKey {
                to: "one_to_one.restaurant".into(),
                on_delete: OnDelete::Cascade,
                related_name: None,
            },
        );
        assert!(fk.is_relation());
        assert_eq!(fk.field_type.related_model(), Some("one_to_one.restaurant"));

        let m2m = FieldDef::new(
            "tags",
            FieldType::ManyToManyField {
                to: "blog.tag".into(),
                related_name: Some("places".into()),
            },
        );
        assert!(m2m.is_relation());

        let plain = FieldDef::new("name", FieldType::CharField);
        assert!(!plain.is_relation());
        assert_eq!(plain.field_type.related_model(), None);
    }

    #[test]
    fn test_decimal_field_type() {
        let ft = FieldType::DecimalField {
            max_digits: 10,
            decimal_places: 2,
        };
        let json = serde_json::to_value(&ft).unwrap();
        assert_eq!(json["type"], "DecimalField");
        assert_eq!(json["max_digits"], 10);
    }
}
