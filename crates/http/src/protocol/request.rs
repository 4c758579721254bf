//! HTTP request representation.
//!
//! A [`Request`] is immutable once constructed. The codec builds one per
//! connection turn; handlers only ever consume it.

use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri, Version, header};

use crate::protocol::body::Body;
use crate::protocol::merge_content_headers;

/// An HTTP request: method, target URI, version, headers and body.
///
/// Like [`Response`](crate::protocol::Response), the constructor derives the
/// `content-length` and `content-type` headers from the body so the
/// serializer's framing invariant holds by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
    body: Body,
}

impl Request {
    /// Constructs a request, recomputing the content headers from `body`.
    pub fn new(method: Method, uri: Uri, version: Version, headers: HeaderMap, body: Body) -> Self {
        let mut headers = headers;
        merge_content_headers(&mut headers, &body);
        Self { method, uri, version, headers, body }
    }

    pub fn builder() -> RequestBuilder {
        RequestBuilder::new()
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The request path component of the URI.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn into_body(self) -> Body {
        self.body
    }

    /// Whether the peer asked to reuse this connection for the next
    /// request/response exchange.
    ///
    /// HTTP/1.1 keeps the connection unless the peer sent
    /// `connection: close`; HTTP/1.0 closes unless it sent
    /// `connection: keep-alive`.
    pub fn keep_alive(&self) -> bool {
        let connection = self.headers.get(header::CONNECTION).and_then(|value| value.to_str().ok());
        match connection {
            Some(value) if value.eq_ignore_ascii_case("close") => false,
            Some(value) if value.eq_ignore_ascii_case("keep-alive") => true,
            _ => self.version == Version::HTTP_11,
        }
    }
}

/// Builder for [`Request`], mostly used by clients and tests.
#[derive(Debug, Default)]
pub struct RequestBuilder {
    method: Method,
    uri: Uri,
    version: Option<Version>,
    headers: HeaderMap,
}

impl RequestBuilder {
    fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn uri(mut self, uri: Uri) -> Self {
        self.uri = uri;
        self
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Finishes the builder, attaching `body` and deriving content headers.
    pub fn body(self, body: Body) -> Request {
        Request::new(self.method, self.uri, self.version.unwrap_or(Version::HTTP_11), self.headers, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(version: Version, connection: Option<&'static str>) -> Request {
        let mut builder = Request::builder().method(Method::GET).uri(Uri::from_static("/")).version(version);
        if let Some(value) = connection {
            builder = builder.header(header::CONNECTION, HeaderValue::from_static(value));
        }
        builder.body(Body::empty())
    }

    #[test]
    fn keep_alive_defaults_per_version() {
        assert!(get(Version::HTTP_11, None).keep_alive());
        assert!(!get(Version::HTTP_10, None).keep_alive());
    }

    #[test]
    fn connection_header_overrides_default() {
        assert!(!get(Version::HTTP_11, Some("close")).keep_alive());
        assert!(!get(Version::HTTP_11, Some("Close")).keep_alive());
        assert!(get(Version::HTTP_10, Some("keep-alive")).keep_alive());
    }

    #[test]
    fn content_headers_follow_body() {
        let request = Request::builder()
            .method(Method::POST)
            .uri(Uri::from_static("/items"))
            .body(Body::bytes(r#"{"id":1}"#, mime::APPLICATION_JSON));

        assert_eq!(request.headers().get(header::CONTENT_LENGTH), Some(&HeaderValue::from_static("8")));
        assert_eq!(request.headers().get(header::CONTENT_TYPE), Some(&HeaderValue::from_static("application/json")));
    }
}
