//! HTTP response types.
//!
//! [`HttpResponse`] is a small status + headers + text body value that converts
//! into an Axum response. [`JsonResponse`] builds JSON-bodied responses, which
//! is how API errors reach the client.

use axum::response::IntoResponse;
use http::{HeaderMap, HeaderValue, StatusCode};

/// An HTTP response.
///
/// # Examples
///
/// ```
/// use ufilter_http::HttpResponse;
///
/// let response = HttpResponse::ok("Hello, World!");
/// assert_eq!(response.status(), http::StatusCode::OK);
/// assert_eq!(response.content(), "Hello, World!");
/// ```
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    content: String,
    content_type: String,
}

impl HttpResponse {
    /// Creates a new `HttpResponse` with the given status code and text body.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            content: body.into(),
            content_type: "text/html".to_string(),
        }
    }

    /// Creates a 200 OK response with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// Creates a 400 Bad Request response.
    pub fn bad_request(body: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, body)
    }

    /// Creates a 500 Internal Server Error response.
    pub fn server_error(body: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, body)
    }

    /// Returns the status code.
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Sets the status code.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Returns a reference to the headers.
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Adds a header to the response.
    #[must_use]
    pub fn set_header(mut self, name: http::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Returns the content type (without charset).
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Sets the content type.
    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.content_type = content_type.into();
    }

    /// Returns the response body.
    pub fn content(&self) -> &str {
        &self.content
    }

    fn full_content_type(&self) -> String {
        if self.content_type.starts_with("text/") || self.content_type.contains("json") {
            format!("{}; charset=utf-8", self.content_type)
        } else {
            self.content_type.clone()
        }
    }
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> axum::response::Response {
        let content_type = self.full_content_type();
        let mut response = axum::response::Response::new(axum::body::Body::from(self.content));
        *response.status_mut() = self.status;
        if let Ok(ct) = HeaderValue::from_str(&content_type) {
            response.headers_mut().insert(http::header::CONTENT_TYPE, ct);
        }
        for (key, value) in &self.headers {
            response.headers_mut().insert(key, value.clone());
        }
        response
    }
}

/// A JSON response.
///
/// Serializes the given data as JSON and sets the content type to `application/json`.
pub struct JsonResponse;

impl JsonResponse {
    /// Creates a 200 OK JSON response from a serializable value.
    ///
    /// Falls back to a 500 response if serialization fails.
    pub fn new<T: serde::Serialize>(data: &T) -> HttpResponse {
        Self::with_status(StatusCode::OK, data)
    }

    /// Creates a JSON response with a custom status code.
    ///
    /// Falls back to a 500 response if serialization fails.
    pub fn with_status<T: serde::Serialize>(status: StatusCode, data: &T) -> HttpResponse {
        match serde_json::to_string(data) {
            Ok(json) => {
                let mut response = HttpResponse::new(status, json);
                response.set_content_type("application/json");
                response
            }
            Err(e) => HttpResponse::server_error(format!("JSON serialization error: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(HttpResponse::ok("").status(), StatusCode::OK);
        assert_eq!(HttpResponse::bad_request("").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            HttpResponse::server_error("").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_json_response() {
        let response = JsonResponse::with_status(
            StatusCode::BAD_REQUEST,
            &serde_json::json!({"id": ["Enter a number."]}),
        );
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.content_type(), "application/json");
        let body: serde_json::Value = serde_json::from_str(response.content()).unwrap();
        assert_eq!(body["id"][0], "Enter a number.");
    }

    #[test]
    fn test_into_response_headers() {
        let response = JsonResponse::new(&serde_json::json!([]))
            .set_header(
                http::header::HeaderName::from_static("x-filter"),
                HeaderValue::from_static("1"),
            )
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "application/json; charset=utf-8"
        );
        assert_eq!(response.headers().get("x-filter").unwrap(), "1");
    }

    #[test]
    fn test_set_status() {
        let mut response = HttpResponse::ok("x");
        response.set_status(StatusCode::ACCEPTED);
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.full_content_type(), "text/html; charset=utf-8");
    }
}
