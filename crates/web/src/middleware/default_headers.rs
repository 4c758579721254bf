use std::sync::Arc;

use async_trait::async_trait;
use http::{HeaderMap, HeaderName, HeaderValue, header};

use skiff_http::protocol::{Request, Response};
use skiff_http::responder::{BoxError, Responder};

use crate::date::DateService;

use super::Middleware;

/// Merges a fixed set of default headers into every response.
///
/// A default never overwrites a value the handler already set for the same
/// name. Unless disabled, a cached `date` header is included alongside the
/// configured set.
pub struct DefaultHeaders {
    headers: HeaderMap,
    date: bool,
}

impl DefaultHeaders {
    pub fn new() -> Self {
        Self { headers: HeaderMap::new(), date: true }
    }

    /// Adds a default header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// A `server` identification header.
    pub fn server(self, value: HeaderValue) -> Self {
        self.header(header::SERVER, value)
    }

    pub fn without_date(mut self) -> Self {
        self.date = false;
        self
    }
}

impl Default for DefaultHeaders {
    fn default() -> Self {
        Self::new()
    }
}

struct DefaultHeadersResponder {
    defaults: HeaderMap,
    date: bool,
    inner: Arc<dyn Responder>,
}

#[async_trait]
impl Responder for DefaultHeadersResponder {
    async fn respond(&self, request: Request) -> Result<Response, BoxError> {
        let response = self.inner.respond(request).await?;
        let (status, version, mut headers, body) = response.into_parts();

        for (name, value) in self.defaults.iter() {
            if !headers.contains_key(name) {
                headers.insert(name, value.clone());
            }
        }

        if self.date && !headers.contains_key(header::DATE) {
            DateService::global().with_http_date(|value| {
                headers.insert(header::DATE, value);
            });
        }

        Ok(Response::from_parts(status, version, headers, body))
    }
}

impl Middleware for DefaultHeaders {
    fn wrap(&self, inner: Arc<dyn Responder>) -> Arc<dyn Responder> {
        Arc::new(DefaultHeadersResponder { defaults: self.headers.clone(), date: self.date, inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use skiff_http::protocol::Body;
    use skiff_http::responder::make_responder;

    fn request() -> Request {
        Request::builder().body(Body::empty())
    }

    #[tokio::test]
    async fn fills_in_missing_defaults() {
        let responder = DefaultHeaders::new()
            .server(HeaderValue::from_static("skiff"))
            .wrap(Arc::new(make_responder(|_| async { Ok(Response::new(StatusCode::OK)) })));

        let response = responder.respond(request()).await.unwrap();

        assert_eq!(response.headers().get(header::SERVER), Some(&HeaderValue::from_static("skiff")));
        assert!(response.headers().contains_key(header::DATE));
    }

    #[tokio::test]
    async fn never_overwrites_handler_set_values() {
        let responder = DefaultHeaders::new()
            .server(HeaderValue::from_static("skiff"))
            .without_date()
            .wrap(Arc::new(make_responder(|_| async {
                Ok(Response::builder()
                    .status(StatusCode::OK)
                    .header(header::SERVER, HeaderValue::from_static("custom"))
                    .body(Body::empty()))
            })));

        let response = responder.respond(request()).await.unwrap();

        assert_eq!(response.headers().get(header::SERVER), Some(&HeaderValue::from_static("custom")));
        assert_eq!(response.headers().get(header::DATE), None);
    }
}
