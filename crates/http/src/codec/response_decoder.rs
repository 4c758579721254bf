//! HTTP response decoder, the client-facing parse side of the codec.
//!
//! Structurally the mirror of
//! [`RequestDecoder`](crate::codec::RequestDecoder): status line, header
//! lines, `content-length`-framed body, assembled through an accumulator
//! with one method per scan observation.

use std::cmp;

use bytes::BytesMut;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode, Version};
use tokio_util::codec::Decoder;

use crate::codec::grammar::{self, MAX_HEAD_BYTES};
use crate::protocol::{Body, ParseError, Response};

/// A decoder for HTTP responses implementing the [`Decoder`] trait.
#[derive(Debug)]
pub struct ResponseDecoder {
    state: State,
    raw: RawResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StatusLine,
    Headers,
    Body { remaining: u64 },
}

impl ResponseDecoder {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self { state: State::StatusLine, raw: RawResponse::default() }
    }
}

impl Decoder for ResponseDecoder {
    type Item = Response;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            match self.state {
                State::StatusLine => match grammar::take_line(src, MAX_HEAD_BYTES)? {
                    None => return Ok(None),
                    Some(line) if line.is_empty() => {}
                    Some(line) => {
                        let (status, version) = grammar::parse_status_line(&line)?;
                        self.raw.on_status_line(status, version);
                        self.state = State::Headers;
                    }
                },

                State::Headers => match grammar::take_line(src, MAX_HEAD_BYTES)? {
                    None => return Ok(None),
                    Some(line) if line.is_empty() => {
                        let remaining = self.raw.on_headers_complete()?;
                        if remaining == 0 {
                            self.state = State::StatusLine;
                            return Ok(Some(self.raw.finish()));
                        }
                        self.state = State::Body { remaining };
                    }
                    Some(line) => {
                        let (name, value) = grammar::parse_header_line(&line)?;
                        self.raw.on_header_field(name);
                        self.raw.on_header_value(value);
                    }
                },

                State::Body { remaining } => {
                    if src.is_empty() {
                        return Ok(None);
                    }

                    let take = cmp::min(remaining, src.len() as u64) as usize;
                    let chunk = src.split_to(take);
                    self.raw.on_body_chunk(&chunk);

                    let remaining = remaining - take as u64;
                    if remaining == 0 {
                        self.state = State::StatusLine;
                        return Ok(Some(self.raw.finish()));
                    }

                    self.state = State::Body { remaining };
                    return Ok(None);
                }
            }
        }
    }
}

/// Accumulates scan observations into a [`Response`].
#[derive(Debug)]
struct RawResponse {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    current_field: Option<HeaderName>,
    body: BytesMut,
}

impl Default for RawResponse {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            version: Version::default(),
            headers: HeaderMap::new(),
            current_field: None,
            body: BytesMut::new(),
        }
    }
}

impl RawResponse {
    fn on_status_line(&mut self, status: StatusCode, version: Version) {
        self.status = status;
        self.version = version;
    }

    fn on_header_field(&mut self, name: HeaderName) {
        self.current_field = Some(name);
    }

    fn on_header_value(&mut self, value: HeaderValue) {
        if let Some(name) = self.current_field.take() {
            self.headers.insert(name, value);
        }
    }

    fn on_headers_complete(&mut self) -> Result<u64, ParseError> {
        grammar::body_length(&self.headers)
    }

    fn on_body_chunk(&mut self, chunk: &[u8]) {
        self.body.extend_from_slice(chunk);
    }

    fn finish(&mut self) -> Response {
        let raw = std::mem::take(self);
        let content_type = grammar::declared_content_type(&raw.headers);
        let body = Body::from_parts(raw.body.freeze(), content_type);
        Response::from_parts(raw.status, raw.version, raw.headers, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header;
    use indoc::indoc;

    fn wire(fixture: &str) -> BytesMut {
        BytesMut::from(fixture.replace('\n', "\r\n").as_str())
    }

    #[test]
    fn plain_text_response() {
        let mut buf = wire(indoc! {r"
        HTTP/1.1 200 OK
        Server: skiff
        Content-Type: text/plain; charset=utf-8
        Content-Length: 5

        hello"});

        let response = ResponseDecoder::new().decode(&mut buf).unwrap().unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.version(), Version::HTTP_11);
        assert_eq!(response.headers().get(header::SERVER), Some(&HeaderValue::from_static("skiff")));
        assert_eq!(response.body().data(), b"hello");
        assert_eq!(response.body().content_type(), Some(&mime::TEXT_PLAIN_UTF_8));
    }

    #[test]
    fn missing_content_length_means_empty_body() {
        let mut buf = wire(indoc! {r"
        HTTP/1.1 204 No Content
        Server: skiff

        "});

        let response = ResponseDecoder::new().decode(&mut buf).unwrap().unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.body().is_empty());
    }

    #[test]
    fn bogus_status_code_is_diagnosed() {
        let mut buf = wire("HTTP/1.1 9999 What\n\n");

        let error = ResponseDecoder::new().decode(&mut buf).unwrap_err();
        assert!(matches!(error, ParseError::InvalidStatus { .. }));
        assert_eq!(error.to_string(), "invalid http status: code 9999 is not a valid status");
    }
}
