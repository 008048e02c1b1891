//! A single named filter and the coercion of raw query-string values.
//!
//! [`Filter::build_lookup`] turns the text of one query parameter into a typed
//! [`Lookup`]. Coercion failures come back as user-facing messages, in the
//! same wording form fields use.

use std::fmt;

use regex::Regex;
use ufilter_db::fields::{FieldDef, FieldType};
use ufilter_db::model::{MetaField, RelatedObject};
use ufilter_db::query::{Lookup, Q};
use ufilter_db::value::Value;

use crate::lookup_type::LookupType;

const COMMON: &[LookupType] = &[LookupType::Exact, LookupType::In, LookupType::IsNull];

const ORDERED: &[LookupType] = &[
    LookupType::Gt,
    LookupType::Gte,
    LookupType::Lt,
    LookupType::Lte,
    LookupType::Range,
];

/// The value domain of a filter, derived from the model field it targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Text,
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
    Time,
    Uuid,
    /// A relation in either direction; values are primary keys.
    Related,
}

impl FilterKind {
    /// Maps a model field type to the kind of filter generated for it.
    pub const fn from_field_type(field_type: &FieldType) -> Self {
        match field_type {
            FieldType::AutoField
            | FieldType::BigAutoField
            | FieldType::IntegerField
            | FieldType::BigIntegerField
            | FieldType::SmallIntegerField => Self::Integer,
            FieldType::FloatField | FieldType::DecimalField { .. } => Self::Float,
            FieldType::BooleanField => Self::Boolean,
            FieldType::DateField => Self::Date,
            FieldType::DateTimeField => Self::DateTime,
            FieldType::TimeField => Self::Time,
            FieldType::UuidField => Self::Uuid,
            FieldType::ForeignKey { .. }
            | FieldType::OneToOneField { .. }
            | FieldType::ManyToManyField { .. } => Self::Related,
            FieldType::CharField
            | FieldType::TextField
            | FieldType::EmailField
            | FieldType::UrlField
            | FieldType::SlugField
            | FieldType::JsonField => Self::Text,
        }
    }

    /// Returns the lookups a filter of this kind accepts.
    pub fn default_lookups(self) -> Vec<LookupType> {
        match self {
            Self::Text => LookupType::ALL.to_vec(),
            Self::Integer | Self::Float | Self::Date | Self::DateTime | Self::Time => {
                COMMON.iter().chain(ORDERED).copied().collect()
            }
            Self::Boolean => vec![LookupType::Exact, LookupType::IsNull],
            Self::Uuid | Self::Related => COMMON.to_vec(),
        }
    }

    /// Coerces one raw value into this kind's [`Value`].
    pub fn coerce(self, raw: &str) -> Result<Value, String> {
        let raw = raw.trim();
        match self {
            Self::Text => Ok(Value::String(raw.to_string())),
            Self::Integer | Self::Related => raw
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| "Enter a whole number.".to_string()),
            Self::Float => raw
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Value::Float)
                .ok_or_else(|| "Enter a number.".to_string()),
            Self::Boolean => parse_bool(raw)
                .map(Value::Bool)
                .ok_or_else(|| "Select a valid choice.".to_string()),
            Self::Date => chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(Value::Date)
                .map_err(|_| "Enter a valid date (YYYY-MM-DD).".to_string()),
            Self::DateTime => ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
                .iter()
                .find_map(|fmt| chrono::NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(Value::DateTime)
                .ok_or_else(|| "Enter a valid date/time.".to_string()),
            Self::Time => chrono::NaiveTime::parse_from_str(raw, "%H:%M:%S")
                .or_else(|_| chrono::NaiveTime::parse_from_str(raw, "%H:%M"))
                .map(Value::Time)
                .map_err(|_| "Enter a valid time (HH:MM or HH:MM:SS).".to_string()),
            Self::Uuid => uuid::Uuid::parse_str(raw)
                .map(Value::Uuid)
                .map_err(|_| "Enter a valid UUID.".to_string()),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// A named filter over one field of a model.
///
/// `name` is what appears in the query string; `source` is the field the
/// resulting [`Q`] targets. They differ only when a filter is declared under
/// an alias.
///
/// # Examples
///
/// ```
/// use ufilter_db::fields::{FieldDef, FieldType};
/// use ufilter_db::query::Lookup;
/// use ufilter_db::value::Value;
/// use ufilter_filters::{Filter, LookupType};
///
/// let filter = Filter::for_field(&FieldDef::new("id", FieldType::AutoField));
/// assert_eq!(
///     filter.build_lookup(LookupType::Gte, "3", ","),
///     Ok(Lookup::Gte(Value::Int(3)))
/// );
/// assert_eq!(
///     filter.build_lookup(LookupType::Exact, "three", ","),
///     Err(vec!["Enter a whole number.".to_string()])
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub name: String,
    pub source: String,
    pub kind: FilterKind,
    pub lookups: Vec<LookupType>,
}

impl Filter {
    /// Creates a filter with the default lookups of `kind`.
    pub fn new(name: impl Into<String>, kind: FilterKind) -> Self {
        let name = name.into();
        Self {
            source: name.clone(),
            name,
            kind,
            lookups: kind.default_lookups(),
        }
    }

    /// Creates a filter for a concrete model field.
    pub fn for_field(field: &FieldDef) -> Self {
        Self::new(field.name, FilterKind::from_field_type(&field.field_type))
    }

    /// Creates a filter for a reverse relation.
    pub fn for_related_object(related: &RelatedObject) -> Self {
        Self::new(related.name, FilterKind::Related)
    }

    /// Creates a filter for either kind of model field.
    pub fn for_meta_field(field: MetaField<'_>) -> Self {
        match field {
            MetaField::Concrete(f) => Self::for_field(f),
            MetaField::Reverse(r) => Self::for_related_object(r),
        }
    }

    /// Targets a different model field than the filter's name.
    #[must_use]
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Restricts the accepted lookups.
    #[must_use]
    pub fn lookups(mut self, lookups: impl IntoIterator<Item = LookupType>) -> Self {
        self.lookups = lookups.into_iter().collect();
        self
    }

    /// Returns `true` if this filter accepts `lookup`.
    pub fn supports(&self, lookup: LookupType) -> bool {
        self.lookups.contains(&lookup)
    }

    /// Coerces `raw` into a lookup of the given type.
    ///
    /// `separator` splits the operands of `in` and `range`.
    pub fn build_lookup(
        &self,
        lookup_type: LookupType,
        raw: &str,
        separator: &str,
    ) -> Result<Lookup, Vec<String>> {
        if !self.supports(lookup_type) {
            return Err(vec![format!(
                "Lookup '{lookup_type}' is not supported for this field."
            )]);
        }

        let single = |raw: &str| self.kind.coerce(raw).map_err(|e| vec![e]);

        match lookup_type {
            LookupType::Exact => single(raw).map(Lookup::Exact),
            LookupType::Gt => single(raw).map(Lookup::Gt),
            LookupType::Gte => single(raw).map(Lookup::Gte),
            LookupType::Lt => single(raw).map(Lookup::Lt),
            LookupType::Lte => single(raw).map(Lookup::Lte),
            LookupType::IExact => Ok(Lookup::IExact(Value::String(raw.to_string()))),
            LookupType::Contains => Ok(Lookup::Contains(raw.to_string())),
            LookupType::IContains => Ok(Lookup::IContains(raw.to_string())),
            LookupType::StartsWith => Ok(Lookup::StartsWith(raw.to_string())),
            LookupType::IStartsWith => Ok(Lookup::IStartsWith(raw.to_string())),
            LookupType::EndsWith => Ok(Lookup::EndsWith(raw.to_string())),
            LookupType::IEndsWith => Ok(Lookup::IEndsWith(raw.to_string())),
            LookupType::In => {
                let (values, errors): (Vec<_>, Vec<_>) = split_operands(raw, separator)
                    .map(|item| self.kind.coerce(item))
                    .partition(Result::is_ok);
                if errors.is_empty() {
                    Ok(Lookup::In(values.into_iter().filter_map(Result::ok).collect()))
                } else {
                    let mut messages: Vec<String> =
                        errors.into_iter().filter_map(Result::err).collect();
                    messages.dedup();
                    Err(messages)
                }
            }
            LookupType::Range => {
                let operands: Vec<&str> = split_operands(raw, separator).collect();
                let [low, high] = operands.as_slice() else {
                    return Err(vec![format!(
                        "Enter two values separated by '{separator}'."
                    )]);
                };
                match (self.kind.coerce(low), self.kind.coerce(high)) {
                    (Ok(low), Ok(high)) => Ok(Lookup::Range(low, high)),
                    (Err(e), _) | (_, Err(e)) => Err(vec![e]),
                }
            }
            LookupType::IsNull => parse_bool(raw.trim())
                .map(Lookup::IsNull)
                .ok_or_else(|| vec!["Select a valid choice.".to_string()]),
            LookupType::Regex | LookupType::IRegex => {
                if Regex::new(raw).is_err() {
                    return Err(vec!["Enter a valid regular expression.".to_string()]);
                }
                Ok(if lookup_type == LookupType::Regex {
                    Lookup::Regex(raw.to_string())
                } else {
                    Lookup::IRegex(raw.to_string())
                })
            }
        }
    }

    /// Builds the `Q` node for one query parameter.
    pub fn to_q(&self, lookup_type: LookupType, raw: &str, separator: &str) -> Result<Q, Vec<String>> {
        self.build_lookup(lookup_type, raw, separator)
            .map(|lookup| Q::filter(self.source.clone(), lookup))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.name, self.kind)
    }
}

fn split_operands<'a>(raw: &'a str, separator: &'a str) -> impl Iterator<Item = &'a str> {
    raw.split(separator).map(str::trim).filter(|s| !s.is_empty())
}
