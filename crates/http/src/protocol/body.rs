//! The message body abstraction shared by requests and responses.
//!
//! A [`Body`] is a tagged union over the payload shapes the toolkit knows
//! about, not a stream: the wire only frames bodies by `content-length`, so
//! every body can report its exact byte length and, when it carries one, a
//! declared MIME content type. These two facts are the whole contract the
//! codec and the [`Response`](crate::protocol::Response) constructor rely on.

use bytes::Bytes;
use mime::Mime;

/// An HTTP message body.
///
/// Construct one with [`Body::empty`], [`Body::bytes`] or [`Body::text`];
/// parsed messages get theirs from the decoder. A body is immutable once
/// constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    kind: Kind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    /// Zero length, no content type.
    Empty,
    /// A byte payload with an optionally declared content type.
    Payload { data: Bytes, content_type: Option<Mime> },
}

impl Body {
    /// A body with zero length and no content type.
    pub fn empty() -> Self {
        Self { kind: Kind::Empty }
    }

    /// A byte payload with a declared content type.
    pub fn bytes(data: impl Into<Bytes>, content_type: Mime) -> Self {
        Self { kind: Kind::Payload { data: data.into(), content_type: Some(content_type) } }
    }

    /// A `text/plain; charset=utf-8` payload.
    pub fn text(text: impl Into<String>) -> Self {
        Self::bytes(text.into(), mime::TEXT_PLAIN_UTF_8)
    }

    /// Assembles a body from raw wire data and the declared content type.
    ///
    /// Used by the decoders: no data and no declared type collapse to
    /// [`Body::empty`].
    pub fn from_parts(data: Bytes, content_type: Option<Mime>) -> Self {
        if data.is_empty() && content_type.is_none() {
            Self::empty()
        } else {
            Self { kind: Kind::Payload { data, content_type } }
        }
    }

    /// The exact byte length of this body.
    pub fn len(&self) -> u64 {
        match &self.kind {
            Kind::Empty => 0,
            Kind::Payload { data, .. } => data.len() as u64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The declared content type, if the body carries one.
    pub fn content_type(&self) -> Option<&Mime> {
        match &self.kind {
            Kind::Empty => None,
            Kind::Payload { content_type, .. } => content_type.as_ref(),
        }
    }

    /// The raw payload bytes (empty slice for an empty body).
    pub fn data(&self) -> &[u8] {
        match &self.kind {
            Kind::Empty => &[],
            Kind::Payload { data, .. } => data,
        }
    }

    /// Consumes the body, returning the payload bytes.
    pub fn into_bytes(self) -> Bytes {
        match self.kind {
            Kind::Empty => Bytes::new(),
            Kind::Payload { data, .. } => data,
        }
    }

    /// Returns the payload bytes only when the declared content type matches
    /// `kind` by essence (type/subtype, parameters ignored).
    ///
    /// This is the capability probe consumers use instead of inspecting the
    /// body representation: `interpret_as(&mime::APPLICATION_JSON)` yields
    /// the bytes of a JSON body and `None` for anything else.
    pub fn interpret_as(&self, kind: &Mime) -> Option<&[u8]> {
        match &self.kind {
            Kind::Payload { data, content_type: Some(content_type) }
                if content_type.essence_str() == kind.essence_str() =>
            {
                Some(data)
            }
            _ => None,
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        if text.is_empty() { Self::empty() } else { Self::text(text) }
    }
}
