//! HTTP request encoder, the client-facing serialize side of the codec.
//!
//! Mirror of [`ResponseEncoder`](crate::codec::ResponseEncoder): request
//! line, headers in map order, blank line, raw body bytes. The
//! [`Request`] constructor has already derived the `content-length`
//! header from the body.

use std::io::Write;

use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

use crate::codec::{FastWrite, INIT_HEAD_SIZE, version_token, write_headers};
use crate::protocol::{Request, SendError};

/// An encoder for HTTP requests implementing the [`Encoder`] trait.
#[derive(Debug, Default)]
pub struct RequestEncoder;

impl RequestEncoder {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Encoder<Request> for RequestEncoder {
    type Error = SendError;

    fn encode(&mut self, request: Request, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEAD_SIZE + request.body().len() as usize);
        write!(FastWrite(dst), "{} {} {}\r\n", request.method(), request.uri(), version_token(request.version())?)?;

        write_headers(request.headers(), dst);
        dst.put_slice(b"\r\n");
        dst.put_slice(request.body().data());
        Ok(())
    }
}
