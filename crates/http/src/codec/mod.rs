//! Protocol encoding/decoding implementation.
//!
//! Both directions of the wire are covered: the server side pairs
//! [`RequestDecoder`] with [`ResponseEncoder`], a client pairs
//! [`RequestEncoder`] with [`ResponseDecoder`]. All four are
//! `tokio_util::codec` implementations, so they plug into `FramedRead` /
//! `FramedWrite` directly.

mod grammar;
mod request_decoder;
mod request_encoder;
mod response_decoder;
mod response_encoder;

pub use request_decoder::RequestDecoder;
pub use request_encoder::RequestEncoder;
pub use response_decoder::ResponseDecoder;
pub use response_encoder::ResponseEncoder;

use std::io;

use bytes::{BufMut, BytesMut};
use http::{HeaderMap, Version};
use tracing::error;

use crate::protocol::SendError;

/// Initial buffer size reserved for a serialized message head.
pub(crate) const INIT_HEAD_SIZE: usize = 4 * 1024;

pub(crate) fn version_token(version: Version) -> Result<&'static str, SendError> {
    match version {
        Version::HTTP_11 => Ok("HTTP/1.1"),
        Version::HTTP_10 => Ok("HTTP/1.0"),
        v => {
            error!(http_version = ?v, "unsupported http version");
            Err(SendError::unsupported_version(format!("{v:?}")))
        }
    }
}

/// Writes each header as `name: value CRLF`, in map order.
pub(crate) fn write_headers(headers: &HeaderMap, dst: &mut BytesMut) {
    for (name, value) in headers.iter() {
        dst.put_slice(name.as_ref());
        dst.put_slice(b": ");
        dst.put_slice(value.as_ref());
        dst.put_slice(b"\r\n");
    }
}

/// Fast writer implementation for writing to BytesMut.
///
/// Avoids unnecessary bounds checking when writing to the bytes buffer,
/// since enough space has already been reserved.
pub(crate) struct FastWrite<'a>(pub(crate) &'a mut BytesMut);

impl io::Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Body, Request, Response};
    use http::{HeaderValue, Method, StatusCode, Uri, header};
    use tokio_util::codec::{Decoder, Encoder};

    fn round_trip_request(request: Request) -> Request {
        let mut wire = BytesMut::new();
        RequestEncoder::new().encode(request, &mut wire).unwrap();

        let parsed = RequestDecoder::new().decode(&mut wire).unwrap().expect("a complete request was written");
        assert!(wire.is_empty(), "decoder must consume every written byte");
        parsed
    }

    fn round_trip_response(response: Response) -> Response {
        let mut wire = BytesMut::new();
        ResponseEncoder::new().encode(response, &mut wire).unwrap();

        let parsed = ResponseDecoder::new().decode(&mut wire).unwrap().expect("a complete response was written");
        assert!(wire.is_empty(), "decoder must consume every written byte");
        parsed
    }

    #[test]
    fn request_round_trip_without_body() {
        let request = Request::builder()
            .method(Method::GET)
            .uri(Uri::from_static("/index.html"))
            .header(header::HOST, HeaderValue::from_static("localhost"))
            .body(Body::empty());

        assert_eq!(round_trip_request(request.clone()), request);
    }

    #[test]
    fn request_round_trip_with_body() {
        let request = Request::builder()
            .method(Method::POST)
            .uri(Uri::from_static("/items"))
            .header(header::HOST, HeaderValue::from_static("localhost"))
            .body(Body::bytes(vec![0xde, 0xad, 0xbe, 0xef], mime::APPLICATION_OCTET_STREAM));

        assert_eq!(round_trip_request(request.clone()), request);
    }

    #[test]
    fn response_round_trip_for_various_body_lengths() {
        for length in [0usize, 1, 80, 4096] {
            let response = Response::with_body(StatusCode::OK, Body::bytes(vec![b'x'; length], mime::TEXT_PLAIN_UTF_8));
            assert_eq!(round_trip_response(response.clone()), response, "length {length}");
        }
    }

    #[test]
    fn response_round_trip_preserves_custom_headers() {
        let response = Response::builder()
            .status(StatusCode::CREATED)
            .header(header::SERVER, HeaderValue::from_static("skiff"))
            .header(header::LOCATION, HeaderValue::from_static("/items/1"))
            .body(Body::bytes(r#"{"id":1}"#, mime::APPLICATION_JSON));

        assert_eq!(round_trip_response(response.clone()), response);
    }
}
