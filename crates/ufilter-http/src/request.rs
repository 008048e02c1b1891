//! HTTP request type.
//!
//! [`HttpRequest`] carries what view-level filtering needs from a request: the
//! method, the path, headers, and the parsed query parameters.

use std::collections::HashMap;

use http::{HeaderMap, Method};

use crate::querydict::QueryDict;

/// An incoming HTTP request.
///
/// Instances are created from an Axum request via [`HttpRequest::from_axum`],
/// or with [`HttpRequest::builder`] in tests.
///
/// # Examples
///
/// ```
/// use ufilter_http::HttpRequest;
///
/// let request = HttpRequest::builder()
///     .method(http::Method::GET)
///     .path("/places/")
///     .query_string("name=Demon+Dogs")
///     .build();
///
/// assert_eq!(request.method(), &http::Method::GET);
/// assert_eq!(request.path(), "/places/");
/// assert_eq!(request.query_params().get("name"), Some("Demon Dogs"));
/// ```
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    path: String,
    query_string: String,
    query_params: QueryDict,
    headers: HeaderMap,
    meta: HashMap<String, String>,
}

impl HttpRequest {
    /// Creates a new [`HttpRequestBuilder`].
    pub fn builder() -> HttpRequestBuilder {
        HttpRequestBuilder::default()
    }

    /// Creates an `HttpRequest` from the head of an Axum/hyper request.
    pub fn from_axum(parts: http::request::Parts) -> Self {
        let query_string = parts.uri.query().unwrap_or("").to_string();
        let path = parts.uri.path().to_string();

        let mut meta: HashMap<String, String> = parts
            .headers
            .iter()
            .filter_map(|(name, value)| {
                let key = format!("HTTP_{}", name.as_str().to_uppercase().replace('-', "_"));
                value.to_str().ok().map(|v| (key, v.to_string()))
            })
            .collect();
        meta.insert("REQUEST_METHOD".to_string(), parts.method.to_string());
        meta.insert("PATH_INFO".to_string(), path.clone());
        meta.insert("QUERY_STRING".to_string(), query_string.clone());

        Self {
            method: parts.method,
            query_params: QueryDict::parse(&query_string),
            path,
            query_string,
            headers: parts.headers,
            meta,
        }
    }

    /// Returns the HTTP method.
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path (without query string).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the raw query string (without the leading `?`).
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    /// Returns the GET parameters.
    pub const fn get(&self) -> &QueryDict {
        &self.query_params
    }

    /// Returns the parsed query parameters. Same data as [`get`](Self::get),
    /// under the name API views use.
    pub const fn query_params(&self) -> &QueryDict {
        &self.query_params
    }

    /// Returns the request headers.
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the META dictionary (`REQUEST_METHOD`, `HTTP_*` headers, ...).
    pub const fn meta(&self) -> &HashMap<String, String> {
        &self.meta
    }

    /// Returns the path with the query string appended, if any.
    pub fn get_full_path(&self) -> String {
        if self.query_string.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query_string)
        }
    }
}

/// Builder for constructing [`HttpRequest`] instances without a full Axum request.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    method: Method,
    path: String,
    query_string: String,
    headers: HeaderMap,
    meta: HashMap<String, String>,
}

impl Default for HttpRequestBuilder {
    fn default() -> Self {
        Self {
            method: Method::GET,
            path: "/".to_string(),
            query_string: String::new(),
            headers: HeaderMap::new(),
            meta: HashMap::new(),
        }
    }
}

impl HttpRequestBuilder {
    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the request path.
    #[must_use]
    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Sets the query string (without leading `?`).
    #[must_use]
    pub fn query_string(mut self, qs: &str) -> Self {
        self.query_string = qs.to_string();
        self
    }

    /// Adds a header. Invalid names or values are ignored.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            http::header::HeaderName::from_bytes(name.as_bytes()),
            http::header::HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Adds a META entry.
    #[must_use]
    pub fn meta(mut self, key: &str, value: &str) -> Self {
        self.meta.insert(key.to_string(), value.to_string());
        self
    }

    /// Builds the [`HttpRequest`].
    pub fn build(self) -> HttpRequest {
        let mut meta = self.meta;
        meta.entry("REQUEST_METHOD".to_string())
            .or_insert_with(|| self.method.to_string());
        meta.entry("PATH_INFO".to_string())
            .or_insert_with(|| self.path.clone());
        meta.entry("QUERY_STRING".to_string())
            .or_insert_with(|| self.query_string.clone());

        HttpRequest {
            method: self.method,
            path: self.path,
            query_params: QueryDict::parse(&self.query_string),
            query_string: self.query_string,
            headers: self.headers,
            meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let request = HttpRequest::builder().build();
        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.path(), "/");
        assert!(request.query_params().is_empty());
        assert_eq!(request.meta().get("REQUEST_METHOD").map(String::as_str), Some("GET"));
    }

    #[test]
    fn test_builder_query_params() {
        let request = HttpRequest::builder()
            .path("/places/")
            .query_string("id__in=1&id__in=2&name=Demon")
            .build();
        assert_eq!(request.query_params().get_list("id__in").map(Vec::len), Some(2));
        assert_eq!(request.get_full_path(), "/places/?id__in=1&id__in=2&name=Demon");
    }

    #[test]
    fn test_builder_headers_and_meta() {
        let request = HttpRequest::builder()
            .header("Accept", "application/json")
            .header("bad header", "x")
            .meta("REMOTE_ADDR", "127.0.0.1")
            .build();
        assert_eq!(request.headers().len(), 1);
        assert_eq!(
            request.meta().get("REMOTE_ADDR").map(String::as_str),
            Some("127.0.0.1")
        );
    }

    #[test]
    fn test_from_axum() {
        let (parts, ()) = http::Request::builder()
            .method(Method::GET)
            .uri("/places/?name__icontains=dog")
            .header("X-Request-Id", "abc")
            .body(())
            .unwrap()
            .into_parts();
        let request = HttpRequest::from_axum(parts);
        assert_eq!(request.path(), "/places/");
        assert_eq!(request.query_string(), "name__icontains=dog");
        assert_eq!(request.query_params().get("name__icontains"), Some("dog"));
        assert_eq!(
            request.meta().get("HTTP_X_REQUEST_ID").map(String::as_str),
            Some("abc")
        );
    }

    #[test]
    fn test_full_path_without_query() {
        let request = HttpRequest::builder().path("/x/").build();
        assert_eq!(request.get_full_path(), "/x/");
    }
}
