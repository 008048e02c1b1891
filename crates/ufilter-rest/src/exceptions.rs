//! API errors and their JSON rendering.
//!
//! Filter sets fail with a [`ValidationError`] from the data layer. The REST
//! layer reports failures as an [`ApiError`] whose [`ErrorDetail`] has the
//! shape clients expect: `{"field": ["message", ...], ...}`.

use std::collections::BTreeMap;
use std::fmt;

use axum::response::IntoResponse;
use http::StatusCode;
use serde::Serialize;
use ufilter_core::{UfilterError, ValidationError, NON_FIELD_ERRORS};
use ufilter_http::{HttpResponse, JsonResponse};

/// Field name -> messages, ordered by field name.
///
/// # Examples
///
/// ```
/// use ufilter_core::ValidationError;
/// use ufilter_rest::ErrorDetail;
///
/// let error = ValidationError::from_messages([("foo", vec!["bar"])]);
/// let detail = ErrorDetail::from_validation_error(&error);
/// assert_eq!(detail.get("foo"), Some(&["bar".to_string()][..]));
/// assert_eq!(detail.to_string(), r#"{"foo":["bar"]}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorDetail(BTreeMap<String, Vec<String>>);

impl ErrorDetail {
    /// Translates a validation error into its field -> messages mapping.
    ///
    /// Keys are kept as the error has them, so messages not tied to a field
    /// stay under [`NON_FIELD_ERRORS`].
    pub fn from_validation_error(error: &ValidationError) -> Self {
        Self(error.message_dict())
    }

    /// Returns the messages for `field`.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Returns the field names, in order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the underlying mapping.
    pub const fn as_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.0
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl From<BTreeMap<String, Vec<String>>> for ErrorDetail {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        Self(map)
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// An error an API view reports to its client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request's parameters were rejected. Rendered as 400.
    #[error("Invalid input: {0}")]
    ValidationError(ErrorDetail),

    /// The view is misconfigured. Rendered as 500.
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),
}

impl ApiError {
    /// Returns the HTTP status this error renders with.
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::ImproperlyConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the validation detail, if this is a validation error.
    pub const fn detail(&self) -> Option<&ErrorDetail> {
        match self {
            Self::ValidationError(detail) => Some(detail),
            Self::ImproperlyConfigured(_) => None,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self::ValidationError(ErrorDetail::from_validation_error(&error))
    }
}

impl From<UfilterError> for ApiError {
    fn from(error: UfilterError) -> Self {
        match error {
            UfilterError::ValidationError(e) => e.into(),
            UfilterError::BadRequest(msg) => Self::ValidationError(ErrorDetail(BTreeMap::from([(
                NON_FIELD_ERRORS.to_string(),
                vec![msg],
            )]))),
            other => Self::ImproperlyConfigured(other.to_string()),
        }
    }
}

/// Renders an [`ApiError`] as a JSON response.
///
/// Validation errors render their detail mapping as the body; other errors
/// render `{"detail": message}`.
pub fn exception_handler(error: &ApiError) -> HttpResponse {
    match error {
        ApiError::ValidationError(detail) => JsonResponse::with_status(error.status_code(), detail),
        ApiError::ImproperlyConfigured(_) => JsonResponse::with_status(
            error.status_code(),
            &serde_json::json!({ "detail": error.to_string() }),
        ),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        exception_handler(&self).into_response()
    }
}
