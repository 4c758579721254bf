//! The line-level HTTP/1.1 grammar shared by the request and response
//! decoders.
//!
//! The decoders are explicit state machines (start line, header lines,
//! body) over the buffer filled by `FramedRead`. The functions here are the
//! pure scanning steps: each takes bytes off the front of the buffer and
//! either produces a parsed observation, asks for more input (`None`), or
//! rejects the input with a [`ParseError`] naming the grammar rule that
//! failed.

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri, Version, header};
use mime::Mime;

use crate::ensure;
use crate::protocol::ParseError;

/// Maximum size in bytes allowed for a message's start line + header block.
///
/// Matches the connection read buffer, so one buffered read can always hold
/// a full head.
pub(crate) const MAX_HEAD_BYTES: usize = 80 * 1024;

/// Takes one CRLF-terminated line off the front of `src`.
///
/// Returns the line without its terminator, or `None` when no full line has
/// arrived yet. An unterminated prefix larger than `max_bytes` is rejected.
pub(crate) fn take_line(src: &mut BytesMut, max_bytes: usize) -> Result<Option<Bytes>, ParseError> {
    match src.windows(2).position(|window| window == b"\r\n") {
        Some(position) => {
            let line = src.split_to(position + 2).freeze();
            Ok(Some(line.slice(..position)))
        }
        None => {
            ensure!(src.len() <= max_bytes, ParseError::too_large_header(src.len(), max_bytes));
            Ok(None)
        }
    }
}

/// Parses `METHOD SP TARGET SP VERSION`.
pub(crate) fn parse_request_line(line: &Bytes) -> Result<(Method, Uri, Version), ParseError> {
    let text = std::str::from_utf8(line).map_err(|_| ParseError::invalid_start_line("request line is not utf-8"))?;
    let mut tokens = text.split(' ');

    let method = tokens.next().filter(|token| !token.is_empty()).ok_or(ParseError::InvalidMethod)?;
    let method = Method::from_bytes(method.as_bytes()).map_err(|_| ParseError::InvalidMethod)?;

    let target = tokens.next().filter(|token| !token.is_empty()).ok_or(ParseError::InvalidUri)?;
    let uri = target.parse::<Uri>().map_err(|_| ParseError::InvalidUri)?;

    let version = tokens.next().ok_or_else(|| ParseError::invalid_start_line("missing http version"))?;
    let version = parse_version(version)?;

    ensure!(tokens.next().is_none(), ParseError::invalid_start_line("expected `METHOD SP TARGET SP VERSION`"));
    Ok((method, uri, version))
}

/// Parses `VERSION SP CODE SP REASON`.
///
/// The reason phrase is advisory and discarded; responses re-serialize with
/// the canonical phrase for the code.
pub(crate) fn parse_status_line(line: &Bytes) -> Result<(StatusCode, Version), ParseError> {
    let text = std::str::from_utf8(line).map_err(|_| ParseError::invalid_start_line("status line is not utf-8"))?;
    let mut tokens = text.splitn(3, ' ');

    let version = tokens.next().filter(|token| !token.is_empty()).ok_or_else(|| ParseError::invalid_start_line("missing http version"))?;
    let version = parse_version(version)?;

    let code = tokens.next().ok_or_else(|| ParseError::invalid_status("missing status code"))?;
    let status = code.parse::<StatusCode>().map_err(|_| ParseError::invalid_status(format!("code {code} is not a valid status")))?;

    Ok((status, version))
}

fn parse_version(token: &str) -> Result<Version, ParseError> {
    match token {
        "HTTP/1.1" => Ok(Version::HTTP_11),
        "HTTP/1.0" => Ok(Version::HTTP_10),
        // http2 and http3 are not supported on this wire
        other => Err(ParseError::invalid_version(other)),
    }
}

/// Parses `name: value`, trimming optional whitespace around the value.
pub(crate) fn parse_header_line(line: &Bytes) -> Result<(HeaderName, HeaderValue), ParseError> {
    let colon = line.iter().position(|byte| *byte == b':').ok_or_else(|| ParseError::invalid_header("missing ':' separator"))?;

    let name = HeaderName::from_bytes(&line[..colon]).map_err(|e| ParseError::invalid_header(e))?;
    let value = HeaderValue::from_bytes(trim_ows(&line[colon + 1..])).map_err(|e| ParseError::invalid_header(e))?;

    Ok((name, value))
}

fn trim_ows(mut bytes: &[u8]) -> &[u8] {
    while let [b' ' | b'\t', rest @ ..] = bytes {
        bytes = rest;
    }
    while let [rest @ .., b' ' | b'\t'] = bytes {
        bytes = rest;
    }
    bytes
}

/// Fixes the body length from the header block.
///
/// Bodies are framed by `content-length` only: no header means no body, and
/// `transfer-encoding` is rejected outright.
pub(crate) fn body_length(headers: &HeaderMap) -> Result<u64, ParseError> {
    ensure!(
        !headers.contains_key(header::TRANSFER_ENCODING),
        ParseError::invalid_body("transfer-encoding is not supported, bodies are content-length framed")
    );

    match headers.get(header::CONTENT_LENGTH) {
        None => Ok(0),
        Some(value) => {
            let text = value.to_str().map_err(|_| ParseError::invalid_content_length("value is not visible ascii"))?;
            text.trim().parse::<u64>().map_err(|_| ParseError::invalid_content_length(format!("value {text} is not u64")))
        }
    }
}

/// The content type a message declared for its body, if any parses.
pub(crate) fn declared_content_type(headers: &HeaderMap) -> Option<Mime> {
    headers.get(header::CONTENT_TYPE)?.to_str().ok()?.parse::<Mime>().ok()
}
