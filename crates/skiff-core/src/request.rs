//! Intercepted request descriptor.

use http::header::AsHeaderName;
use http::{HeaderMap, HeaderName, HeaderValue, Method};

/// An outgoing request intercepted from the hosting environment.
///
/// The URL is kept as the raw string the host delivered; URL pattern
/// matching and cache identity both operate on it verbatim.
#[derive(Debug, Clone)]
pub struct Request {
    url: String,
    method: Method,
    headers: HeaderMap,
}

impl Request {
    /// Create a request with an explicit method.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            headers: HeaderMap::new(),
        }
    }

    /// Create a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// Attach a header, replacing any previous value under the same name.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// The request URL as the host delivered it.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// All request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A header value as UTF-8, if present and valid.
    pub fn header(&self, name: impl AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl std::fmt::Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header;

    #[test]
    fn test_request_get_defaults() {
        let req = Request::get("https://example.com/page");
        assert_eq!(req.url(), "https://example.com/page");
        assert_eq!(req.method(), &Method::GET);
        assert!(req.headers().is_empty());
    }

    #[test]
    fn test_request_header_lookup_case_insensitive() {
        let req = Request::get("/").with_header(
            header::ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml"),
        );
        assert_eq!(req.header("Accept"), Some("text/html,application/xhtml+xml"));
        assert_eq!(req.header("accept"), Some("text/html,application/xhtml+xml"));
        assert_eq!(req.header("content-type"), None);
    }

    #[test]
    fn test_request_with_header_replaces() {
        let req = Request::get("/")
            .with_header(header::ACCEPT, HeaderValue::from_static("text/plain"))
            .with_header(header::ACCEPT, HeaderValue::from_static("text/html"));
        assert_eq!(req.header(header::ACCEPT), Some("text/html"));
    }

    #[test]
    fn test_request_display() {
        let req = Request::new(Method::POST, "/api/items");
        assert_eq!(req.to_string(), "POST /api/items");
    }
}
