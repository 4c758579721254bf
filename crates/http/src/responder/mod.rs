//! The handler contract: a responder maps a request to a response.
//!
//! Everything above the connection loop — routers, middlewares, plain
//! functions — plugs in through this trait. A responder may fail; the
//! connection server recovers any failure through its failure responder, so
//! errors here never tear down a connection on their own.

use std::error::Error;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::protocol::{Request, Response};

/// The error type responders are allowed to fail with.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// A function from request to response, the uniform handler contract.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, request: Request) -> Result<Response, BoxError>;
}

#[async_trait]
impl<T: Responder + ?Sized> Responder for Arc<T> {
    async fn respond(&self, request: Request) -> Result<Response, BoxError> {
        (**self).respond(request).await
    }
}

/// Adapts a plain async function into a [`Responder`].
#[derive(Debug)]
pub struct ResponderFn<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> Responder for ResponderFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response, BoxError>> + Send,
{
    async fn respond(&self, request: Request) -> Result<Response, BoxError> {
        (self.f)(request).await
    }
}

pub fn make_responder<F, Fut>(f: F) -> ResponderFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response, BoxError>> + Send,
{
    ResponderFn { f }
}
