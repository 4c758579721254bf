use std::sync::Arc;

use async_trait::async_trait;
use http::{HeaderValue, header};

use skiff_http::protocol::{Request, Response};
use skiff_http::responder::{BoxError, Responder};

use super::Middleware;

/// Stamps `connection: keep-alive` on responses to requests that keep the
/// connection open.
///
/// The header reflects the per-request keep-alive decision, so an existing
/// value is overwritten. Responses on closing connections are left alone.
#[derive(Debug, Default)]
pub struct KeepAlive;

impl KeepAlive {
    pub fn new() -> Self {
        Default::default()
    }
}

struct KeepAliveResponder {
    inner: Arc<dyn Responder>,
}

#[async_trait]
impl Responder for KeepAliveResponder {
    async fn respond(&self, request: Request) -> Result<Response, BoxError> {
        let keep_alive = request.keep_alive();
        let response = self.inner.respond(request).await?;

        if !keep_alive {
            return Ok(response);
        }

        let (status, version, mut headers, body) = response.into_parts();
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        Ok(Response::from_parts(status, version, headers, body))
    }
}

impl Middleware for KeepAlive {
    fn wrap(&self, inner: Arc<dyn Responder>) -> Arc<dyn Responder> {
        Arc::new(KeepAliveResponder { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{StatusCode, Version};
    use skiff_http::protocol::Body;
    use skiff_http::responder::make_responder;

    fn wrapped() -> Arc<dyn Responder> {
        KeepAlive::new().wrap(Arc::new(make_responder(|_| async { Ok(Response::new(StatusCode::OK)) })))
    }

    #[tokio::test]
    async fn injects_header_for_keep_alive_requests() {
        let request = Request::builder().version(Version::HTTP_11).body(Body::empty());
        let response = wrapped().respond(request).await.unwrap();

        assert_eq!(response.headers().get(header::CONNECTION), Some(&HeaderValue::from_static("keep-alive")));
    }

    #[tokio::test]
    async fn leaves_closing_requests_alone() {
        let request = Request::builder()
            .version(Version::HTTP_11)
            .header(header::CONNECTION, HeaderValue::from_static("close"))
            .body(Body::empty());
        let response = wrapped().respond(request).await.unwrap();

        assert_eq!(response.headers().get(header::CONNECTION), None);
    }
}
