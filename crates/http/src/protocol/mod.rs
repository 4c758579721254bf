//! Protocol types and abstractions: requests, responses, bodies and the
//! error taxonomy shared by the codec and the connection server.

pub mod body;

mod error;
mod request;
mod response;

pub use body::Body;
pub use error::{HttpError, ParseError, SendError};
pub use request::{Request, RequestBuilder};
pub use response::{Response, ResponseBuilder};

use http::{HeaderMap, HeaderValue, header};

/// Recomputes the content headers of a message from its body.
///
/// `content-length` always reflects the body's byte length; `content-type`
/// is set to the body's declared type or removed when it has none. All other
/// entries in `headers` are left alone.
pub(crate) fn merge_content_headers(headers: &mut HeaderMap, body: &Body) {
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
    match body.content_type() {
        Some(content_type) => {
            // a Mime is always a valid header value
            let value = HeaderValue::from_str(content_type.as_ref()).unwrap();
            headers.insert(header::CONTENT_TYPE, value);
        }
        None => {
            headers.remove(header::CONTENT_TYPE);
        }
    }
}
