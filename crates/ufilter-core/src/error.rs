//! Core error types for ufilter-rs.
//!
//! [`ValidationError`] is the data-layer validation failure raised by filter
//! sets when query parameters are rejected. [`UfilterError`] is the umbrella
//! error for configuration, lookup and I/O failures.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// The key under which errors that are not tied to a field are collected.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Represents a validation error with optional field-level errors.
///
/// Validation errors can be either simple (a single message) or compound
/// (containing per-field error lists). Field errors are kept in key order so
/// that the flattened [`message_dict`](ValidationError::message_dict) is stable.
///
/// # Examples
///
/// ```
/// use ufilter_core::error::ValidationError;
///
/// // Simple validation error
/// let err = ValidationError::new("Enter a whole number.", "invalid");
///
/// // Field-level validation errors
/// let mut field_errors = std::collections::BTreeMap::new();
/// field_errors.insert(
///     "id".to_string(),
///     vec![ValidationError::new("Enter a whole number.", "invalid")],
/// );
/// let err = ValidationError::with_field_errors(field_errors);
/// assert_eq!(err.message_dict()["id"], vec!["Enter a whole number.".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The primary error message.
    pub message: String,
    /// A short code identifying the type of validation failure (e.g. "required", "invalid").
    pub code: String,
    /// Additional parameters providing context for the error message.
    pub params: BTreeMap<String, String>,
    /// Per-field validation errors, keyed by field name.
    pub field_errors: BTreeMap<String, Vec<Self>>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            params: BTreeMap::new(),
            field_errors: BTreeMap::new(),
        }
    }

    /// Creates a `ValidationError` containing per-field errors.
    pub fn with_field_errors(field_errors: BTreeMap<String, Vec<Self>>) -> Self {
        Self {
            message: String::new(),
            code: String::new(),
            params: BTreeMap::new(),
            field_errors,
        }
    }

    /// Creates a `ValidationError` from plain field -> messages pairs.
    ///
    /// Every message gets the `invalid` code.
    pub fn from_messages<I, K, M>(messages: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<M>)>,
        K: Into<String>,
        M: Into<String>,
    {
        let field_errors = messages
            .into_iter()
            .map(|(field, msgs)| {
                let errors = msgs
                    .into_iter()
                    .map(|m| Self::new(m, "invalid"))
                    .collect();
                (field.into(), errors)
            })
            .collect();
        Self::with_field_errors(field_errors)
    }

    /// Adds a parameter to this validation error.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Returns `true` if this error carries per-field errors.
    pub fn has_field_errors(&self) -> bool {
        !self.field_errors.is_empty()
    }

    /// Flattens this error into a field -> messages mapping.
    ///
    /// Nested errors contribute their own messages (recursively) under the
    /// outer field name. A simple error lands under [`NON_FIELD_ERRORS`].
    pub fn message_dict(&self) -> BTreeMap<String, Vec<String>> {
        let mut dict = BTreeMap::new();
        if !self.message.is_empty() {
            dict.insert(NON_FIELD_ERRORS.to_string(), vec![self.message.clone()]);
        }
        for (field, errors) in &self.field_errors {
            let messages: &mut Vec<String> = dict.entry(field.clone()).or_default();
            for error in errors {
                messages.extend(error.messages());
            }
        }
        dict
    }

    /// Returns every message carried by this error, depth first.
    pub fn messages(&self) -> Vec<String> {
        let mut out = Vec::new();
        if !self.message.is_empty() {
            out.push(self.message.clone());
        }
        for errors in self.field_errors.values() {
            for error in errors {
                out.extend(error.messages());
            }
        }
        out
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            write!(f, "{}", self.message)?;
        } else if !self.field_errors.is_empty() {
            let mut first = true;
            for (field, errors) in &self.field_errors {
                for error in errors {
                    if !first {
                        write!(f, "; ")?;
                    }
                    write!(f, "{field}: {error}")?;
                    first = false;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for ufilter-rs.
///
/// Each variant maps to an HTTP status code via [`UfilterError::status_code`].
#[derive(Error, Debug)]
pub enum UfilterError {
    // ── Request errors ───────────────────────────────────────────────

    /// HTTP 400 Bad Request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// One or more fields failed validation.
    #[error("Validation error: {0}")]
    ValidationError(ValidationError),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A component is wired up in a way that cannot work.
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    /// A model has no field with the requested name.
    #[error("{model} has no field named '{field}'")]
    FieldDoesNotExist {
        /// The model label (e.g. "one_to_one.place").
        model: String,
        /// The missing field name.
        field: String,
    },

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // ── Security ─────────────────────────────────────────────────────

    /// A potentially malicious operation was detected.
    #[error("Suspicious operation: {0}")]
    SuspiciousOperation(String),
}

impl UfilterError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// - `BadRequest`, `ValidationError` -> 400
    /// - `SuspiciousOperation` -> 403
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) | Self::ValidationError(_) => 400,
            Self::SuspiciousOperation(_) => 403,
            Self::ConfigurationError(_)
            | Self::ImproperlyConfigured(_)
            | Self::FieldDoesNotExist { .. }
            | Self::IoError(_) => 500,
        }
    }
}

impl From<ValidationError> for UfilterError {
    fn from(err: ValidationError) -> Self {
        Self::ValidationError(err)
    }
}

/// A convenience type alias for `Result<T, UfilterError>`.
pub type UfilterResult<T> = Result<T, UfilterError>;
