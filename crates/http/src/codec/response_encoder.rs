//! HTTP response encoder.
//!
//! Writes the status line (with the canonical reason phrase), one
//! `name: value` line per header in map order, a blank line, then the raw
//! body bytes with no additional framing. The body length always matches
//! the `content-length` header already present: the [`Response`]
//! constructor derives that header from the body, not the encoder.

use std::io::Write;

use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

use crate::codec::{FastWrite, INIT_HEAD_SIZE, version_token, write_headers};
use crate::protocol::{Response, SendError};

/// An encoder for HTTP responses implementing the [`Encoder`] trait.
#[derive(Debug, Default)]
pub struct ResponseEncoder;

impl ResponseEncoder {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Encoder<Response> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, response: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (status, version, headers, body) = response.into_parts();

        dst.reserve(INIT_HEAD_SIZE + body.len() as usize);
        write!(
            FastWrite(dst),
            "{} {} {}\r\n",
            version_token(version)?,
            status.as_str(),
            status.canonical_reason().unwrap_or("Unknown")
        )?;

        write_headers(&headers, dst);
        dst.put_slice(b"\r\n");
        dst.put_slice(body.data());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Body;
    use http::{HeaderValue, StatusCode, Version, header};

    fn encode(response: Response) -> String {
        let mut dst = BytesMut::new();
        ResponseEncoder::new().encode(response, &mut dst).unwrap();
        String::from_utf8(dst.to_vec()).unwrap()
    }

    #[test]
    fn status_line_uses_canonical_reason() {
        let encoded = encode(Response::new(StatusCode::NOT_FOUND));

        assert!(encoded.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(encoded.contains("content-length: 0\r\n"));
        assert!(encoded.ends_with("\r\n\r\n"));
    }

    #[test]
    fn body_follows_blank_line_unframed() {
        let encoded = encode(Response::with_body(StatusCode::OK, Body::text("hello")));

        assert!(encoded.ends_with("\r\n\r\nhello"));
        assert!(encoded.contains("content-length: 5\r\n"));
        assert!(encoded.contains("content-type: text/plain; charset=utf-8\r\n"));
    }

    #[test]
    fn unsupported_version_is_refused() {
        let response = Response::builder()
            .status(StatusCode::OK)
            .version(Version::HTTP_2)
            .header(header::SERVER, HeaderValue::from_static("skiff"))
            .body(Body::empty());

        let mut dst = BytesMut::new();
        let error = ResponseEncoder::new().encode(response, &mut dst).unwrap_err();
        assert!(matches!(error, SendError::UnsupportedVersion { .. }));
    }
}
