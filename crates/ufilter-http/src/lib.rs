//! # ufilter-http
//!
//! HTTP layer for ufilter-rs. Provides the request type filter backends read
//! query parameters from, and the response types errors are rendered into.

pub mod querydict;
pub mod request;
pub mod response;

pub use querydict::QueryDict;
pub use request::{HttpRequest, HttpRequestBuilder};
pub use response::{HttpResponse, JsonResponse};
