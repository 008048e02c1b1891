//! Request factory for building [`HttpRequest`] objects in tests.
//!
//! ## Example
//!
//! ```
//! use ufilter_test::RequestFactory;
//!
//! let factory = RequestFactory::new();
//! let request = factory.get_with_query("/places/", &[("name", "Demon Dogs")]);
//! assert_eq!(request.method(), &http::Method::GET);
//! assert_eq!(request.query_params().get("name"), Some("Demon Dogs"));
//! ```

use std::collections::BTreeMap;

use http::Method;
use ufilter_http::HttpRequest;

/// A factory for building [`HttpRequest`] objects without routing or middleware.
#[derive(Debug, Clone, Default)]
pub struct RequestFactory {
    default_headers: BTreeMap<String, String>,
    default_meta: BTreeMap<String, String>,
}

impl RequestFactory {
    /// Creates a new request factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header included in every request.
    #[must_use]
    pub fn with_default_header(mut self, name: &str, value: &str) -> Self {
        self.default_headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Adds a META entry included in every request.
    #[must_use]
    pub fn with_default_meta(mut self, key: &str, value: &str) -> Self {
        self.default_meta.insert(key.to_string(), value.to_string());
        self
    }

    /// Builds a GET request. `path` may carry a `?query`.
    pub fn get(&self, path: &str) -> HttpRequest {
        let (path, query) = path.split_once('?').unwrap_or((path, ""));
        self.build_request(Method::GET, path, query)
    }

    /// Builds a GET request with the given query parameters, percent-encoded.
    pub fn get_with_query(&self, path: &str, params: &[(&str, &str)]) -> HttpRequest {
        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        self.build_request(Method::GET, path, &query)
    }

    fn build_request(&self, method: Method, path: &str, query: &str) -> HttpRequest {
        let mut builder = HttpRequest::builder()
            .method(method)
            .path(path)
            .query_string(query);
        for (name, value) in &self.default_headers {
            builder = builder.header(name, value);
        }
        for (key, value) in &self.default_meta {
            builder = builder.meta(key, value);
        }
        builder.build()
    }
}

fn encode(input: &str) -> String {
    percent_encoding::utf8_percent_encode(input, percent_encoding::NON_ALPHANUMERIC).to_string()
}
