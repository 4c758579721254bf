//! HTTP response representation.

use http::{HeaderMap, HeaderName, HeaderValue, StatusCode, Version};

use crate::protocol::body::Body;
use crate::protocol::merge_content_headers;

/// An HTTP response: status, version, headers and body.
///
/// The constructor derives `content-length` (always, `0` for an empty body)
/// and `content-type` (only when the body declares one) from the body. Any
/// caller-supplied values for those two names are recomputed; every other
/// header passes through untouched. The serializer relies on this: the body
/// bytes it writes always match the `content-length` it already emitted.
///
/// A response is immutable once constructed; middlewares that add headers
/// rebuild one via [`Response::into_parts`] / [`Response::from_parts`].
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    body: Body,
}

impl Response {
    /// A response with the given status and an empty body.
    pub fn new(status: StatusCode) -> Self {
        Self::with_body(status, Body::empty())
    }

    /// A response with the given status and body.
    pub fn with_body(status: StatusCode, body: Body) -> Self {
        Self::from_parts(status, Version::HTTP_11, HeaderMap::new(), body)
    }

    /// Assembles a response from parts, deriving the content headers.
    pub fn from_parts(status: StatusCode, version: Version, headers: HeaderMap, body: Body) -> Self {
        let mut headers = headers;
        merge_content_headers(&mut headers, &body);
        Self { status, version, headers, body }
    }

    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::new()
    }

    pub fn status(&self) -> StatusCode {
        self.status
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

    /// Decomposes the response so a new one can be built from its parts.
    pub fn into_parts(self) -> (StatusCode, Version, HeaderMap, Body) {
        (self.status, self.version, self.headers, self.body)
    }
}

/// Builder for [`Response`].
#[derive(Debug)]
pub struct ResponseBuilder {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
}

impl ResponseBuilder {
    fn new() -> Self {
        Self { status: StatusCode::OK, version: Version::HTTP_11, headers: HeaderMap::new() }
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Finishes the builder, attaching `body` and deriving content headers.
    pub fn body(self, body: Body) -> Response {
        Response::from_parts(self.status, self.version, self.headers, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header;

    #[test]
    fn empty_body_derives_zero_length_and_no_type() {
        let response = Response::new(StatusCode::NO_CONTENT);

        assert_eq!(response.headers().get(header::CONTENT_LENGTH), Some(&HeaderValue::from_static("0")));
        assert_eq!(response.headers().get(header::CONTENT_TYPE), None);
    }

    #[test]
    fn payload_body_derives_both_content_headers() {
        let response = Response::with_body(StatusCode::OK, Body::bytes(r#"{"ok":true}"#, mime::APPLICATION_JSON));

        assert_eq!(response.headers().get(header::CONTENT_LENGTH), Some(&HeaderValue::from_static("11")));
        assert_eq!(response.headers().get(header::CONTENT_TYPE), Some(&HeaderValue::from_static("application/json")));
    }

    #[test]
    fn content_fields_are_recomputed_but_other_headers_pass_through() {
        let response = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_LENGTH, HeaderValue::from_static("999"))
            .header(header::CONTENT_TYPE, HeaderValue::from_static("application/xml"))
            .header(header::SERVER, HeaderValue::from_static("skiff"))
            .body(Body::text("hi"));

        assert_eq!(response.headers().get(header::CONTENT_LENGTH), Some(&HeaderValue::from_static("2")));
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE),
            Some(&HeaderValue::from_static("text/plain; charset=utf-8"))
        );
        assert_eq!(response.headers().get(header::SERVER), Some(&HeaderValue::from_static("skiff")));
    }

    #[test]
    fn stale_content_type_is_removed_for_untyped_body() {
        let response = Response::builder()
            .header(header::CONTENT_TYPE, HeaderValue::from_static("text/html"))
            .body(Body::empty());

        assert_eq!(response.headers().get(header::CONTENT_TYPE), None);
        assert_eq!(response.headers().get(header::CONTENT_LENGTH), Some(&HeaderValue::from_static("0")));
    }
}
