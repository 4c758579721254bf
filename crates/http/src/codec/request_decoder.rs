//! HTTP request decoder.
//!
//! An explicit state machine over the connection's read buffer: the start
//! line, then header lines, then a `content-length`-framed body. Scanning
//! emits observations in wire order and an accumulator ([`RawRequest`])
//! records them one method per observation; when the body completes the
//! accumulator is drained into an immutable [`Request`].
//!
//! A full message is produced per connection turn — bodies are buffered,
//! not streamed.

use std::cmp;

use bytes::BytesMut;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri, Version};
use tokio_util::codec::Decoder;

use crate::codec::grammar::{self, MAX_HEAD_BYTES};
use crate::protocol::{Body, ParseError, Request};

/// A decoder for HTTP requests implementing the [`Decoder`] trait.
///
/// # State machine
///
/// - [`State::StartLine`]: waiting for the request line
/// - [`State::Headers`]: consuming header lines until the blank line
/// - [`State::Body`]: consuming the declared number of body bytes
///
/// After yielding a request the decoder resets itself, so the same instance
/// serves every request of a keep-alive connection.
#[derive(Debug)]
pub struct RequestDecoder {
    state: State,
    raw: RawRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StartLine,
    Headers,
    Body { remaining: u64 },
}

impl RequestDecoder {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self { state: State::StartLine, raw: RawRequest::default() }
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Attempts to decode one HTTP request from the buffer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: a complete request was assembled
    /// - `Ok(None)`: more data is needed
    /// - `Err(_)`: the grammar rejected the input; the diagnostic names the
    ///   failing rule
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            match self.state {
                State::StartLine => match grammar::take_line(src, MAX_HEAD_BYTES)? {
                    None => return Ok(None),
                    // tolerate blank lines between messages
                    Some(line) if line.is_empty() => {}
                    Some(line) => {
                        let (method, uri, version) = grammar::parse_request_line(&line)?;
                        self.raw.on_request_line(method, uri, version);
                        self.state = State::Headers;
                    }
                },

                State::Headers => match grammar::take_line(src, MAX_HEAD_BYTES)? {
                    None => return Ok(None),
                    Some(line) if line.is_empty() => {
                        let remaining = self.raw.on_headers_complete()?;
                        if remaining == 0 {
                            self.state = State::StartLine;
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
                        self.state = State::StartLine;
                        return Ok(Some(self.raw.finish()));
                    }

                    self.state = State::Body { remaining };
                    return Ok(None);
                }
            }
        }
    }
}

/// Accumulates scan observations into a [`Request`].
///
/// Field and value observations pair up sequentially: a value observation
/// completes the entry for the most recently observed field. Storage is
/// last-write-wins per case-insensitive name — duplicate headers are not
/// merged into lists.
#[derive(Debug, Default)]
struct RawRequest {
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
    current_field: Option<HeaderName>,
    body: BytesMut,
}

impl RawRequest {
    fn on_request_line(&mut self, method: Method, uri: Uri, version: Version) {
        self.method = method;
        self.uri = uri;
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

    /// Captures the end of the header block and fixes the body length.
    fn on_headers_complete(&mut self) -> Result<u64, ParseError> {
        grammar::body_length(&self.headers)
    }

    fn on_body_chunk(&mut self, chunk: &[u8]) {
        self.body.extend_from_slice(chunk);
    }

    /// Drains the accumulator into a request, resetting it for the next
    /// message on the connection.
    fn finish(&mut self) -> Request {
        let raw = std::mem::take(self);
        let content_type = grammar::declared_content_type(&raw.headers);
        let body = Body::from_parts(raw.body.freeze(), content_type);
        Request::new(raw.method, raw.uri, raw.version, raw.headers, body)
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
    fn from_curl() {
        let mut buf = wire(indoc! {r"
        GET /index.html HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        "});

        let request = RequestDecoder::new().decode(&mut buf).unwrap().unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.version(), Version::HTTP_11);
        assert_eq!(request.path(), "/index.html");
        assert_eq!(request.uri().query(), None);
        assert!(request.body().is_empty());

        assert_eq!(request.headers().get(header::HOST), Some(&HeaderValue::from_static("127.0.0.1:8080")));
        assert_eq!(request.headers().get(header::USER_AGENT), Some(&HeaderValue::from_static("curl/7.79.1")));
        assert_eq!(request.headers().get(header::ACCEPT), Some(&HeaderValue::from_static("*/*")));

        assert!(buf.is_empty());
    }

    #[test]
    fn body_is_framed_by_content_length() {
        let mut buf = wire(indoc! {r#"
        POST /items HTTP/1.1
        Host: localhost
        Content-Type: application/json
        Content-Length: 8

        {"id":1}"#});

        let request = RequestDecoder::new().decode(&mut buf).unwrap().unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.body().len(), 8);
        assert_eq!(request.body().content_type(), Some(&mime::APPLICATION_JSON));
        assert_eq!(request.body().data(), br#"{"id":1}"#);
    }

    #[test]
    fn partial_input_asks_for_more() {
        let mut decoder = RequestDecoder::new();

        let mut buf = BytesMut::from("GET / HT");
        assert!(decoder.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"TP/1.1\r\nHost: a\r\n");
        assert!(decoder.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"\r\n");
        let request = decoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(request.path(), "/");
    }

    #[test]
    fn body_accumulates_across_reads() {
        let mut decoder = RequestDecoder::new();

        let mut buf = wire(indoc! {r"
        PUT /blob HTTP/1.1
        Content-Length: 10

        01234"});
        assert!(decoder.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"56789");
        let request = decoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(request.body().data(), b"0123456789");
    }

    #[test]
    fn decoder_resets_for_the_next_request() {
        let mut decoder = RequestDecoder::new();
        let mut buf = wire(indoc! {r"
        GET /a HTTP/1.1
        Host: one

        GET /b HTTP/1.1
        Host: two

        "});

        let first = decoder.decode(&mut buf).unwrap().unwrap();
        let second = decoder.decode(&mut buf).unwrap().unwrap();

        assert_eq!(first.path(), "/a");
        assert_eq!(second.path(), "/b");
        assert_eq!(second.headers().get(header::HOST), Some(&HeaderValue::from_static("two")));
    }

    #[test]
    fn duplicate_headers_are_last_write_wins() {
        let mut buf = wire(indoc! {r"
        GET / HTTP/1.1
        X-Token: first
        x-token: second

        "});

        let request = RequestDecoder::new().decode(&mut buf).unwrap().unwrap();

        assert_eq!(request.headers().get("x-token"), Some(&HeaderValue::from_static("second")));
        assert_eq!(request.headers().get_all("x-token").iter().count(), 1);
    }

    #[test]
    fn malformed_header_line_is_a_parse_error() {
        let mut buf = wire(indoc! {r"
        GET / HTTP/1.1
        this line has no separator

        "});

        let error = RequestDecoder::new().decode(&mut buf).unwrap_err();
        assert_eq!(error.to_string(), "invalid header: missing ':' separator");
    }

    #[test]
    fn unknown_version_is_a_parse_error() {
        let mut buf = wire("GET / HTTP/3.0\n\n");

        let error = RequestDecoder::new().decode(&mut buf).unwrap_err();
        assert!(matches!(error, ParseError::InvalidVersion { .. }));
    }
}
