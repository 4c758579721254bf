//! The ergonomic server facade.
//!
//! [`HttpServer`] wires a [`Router`] and a middleware chain into the core
//! connection server: user middlewares wrap outermost, then the built-in
//! [`KeepAlive`] and [`DefaultHeaders`] layers, then the router. The
//! connection's keep-alive decision is the request's own
//! [`keep_alive`](skiff_http::protocol::Request::keep_alive), and responder
//! failures translate to `500` responses carrying the error description.

use std::sync::Arc;

use http::HeaderValue;
use thiserror::Error;
use tracing::info;

use skiff_http::connection::ConnectionService;
use skiff_http::responder::{BoxError, Responder};
use skiff_http::server::{FailureHandler, Server, ServerHandle};

use crate::middleware::{DefaultHeaders, KeepAlive, Middleware, compose};
use crate::router::Router;

const DEFAULT_SERVER_HEADER: HeaderValue = HeaderValue::from_static("skiff");

pub struct HttpServer {
    router: Router,
    middlewares: Vec<Arc<dyn Middleware>>,
    port: u16,
    backlog: u32,
    server_header: HeaderValue,
    failure_handler: Option<FailureHandler>,
    failure_responder: Option<Box<dyn Fn(&BoxError) -> skiff_http::protocol::Response + Send + Sync>>,
}

#[derive(Debug, Error)]
pub enum HttpServerBuildError {
    #[error("a router must be set")]
    MissingRouter,
}

#[derive(Default)]
pub struct HttpServerBuilder {
    router: Option<Router>,
    middlewares: Vec<Arc<dyn Middleware>>,
    port: Option<u16>,
    backlog: Option<u32>,
    server_header: Option<HeaderValue>,
    failure_handler: Option<FailureHandler>,
    failure_responder: Option<Box<dyn Fn(&BoxError) -> skiff_http::protocol::Response + Send + Sync>>,
}

impl HttpServerBuilder {
    pub fn router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    /// Appends a middleware; the first one added wraps outermost.
    pub fn middleware(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn backlog(mut self, backlog: u32) -> Self {
        self.backlog = Some(backlog);
        self
    }

    /// The value of the injected `server` header.
    pub fn server_header(mut self, value: HeaderValue) -> Self {
        self.server_header = Some(value);
        self
    }

    /// Receives transport-level failures (bind, accept, parse, write).
    pub fn failure_handler(mut self, failure_handler: FailureHandler) -> Self {
        self.failure_handler = Some(failure_handler);
        self
    }

    /// Maps responder errors to responses, replacing the default
    /// `500` + error-description translation.
    pub fn failure_responder<F>(mut self, f: F) -> Self
    where
        F: Fn(&BoxError) -> skiff_http::protocol::Response + Send + Sync + 'static,
    {
        self.failure_responder = Some(Box::new(f));
        self
    }

    pub fn build(self) -> Result<HttpServer, HttpServerBuildError> {
        let router = self.router.ok_or(HttpServerBuildError::MissingRouter)?;
        Ok(HttpServer {
            router,
            middlewares: self.middlewares,
            port: self.port.unwrap_or(skiff_http::server::DEFAULT_PORT),
            backlog: self.backlog.unwrap_or(skiff_http::server::DEFAULT_BACKLOG),
            server_header: self.server_header.unwrap_or(DEFAULT_SERVER_HEADER),
            failure_handler: self.failure_handler,
            failure_responder: self.failure_responder,
        })
    }
}

impl HttpServer {
    pub fn builder() -> HttpServerBuilder {
        HttpServerBuilder::default()
    }

    /// Composes the middleware chain around the router.
    ///
    /// Exposed so the pipeline can be exercised without a socket.
    pub fn into_responder(self) -> Arc<dyn Responder> {
        let mut chain = self.middlewares;
        chain.push(Arc::new(KeepAlive::new()));
        chain.push(Arc::new(DefaultHeaders::new().server(self.server_header)));
        compose(&chain, Arc::new(self.router))
    }

    /// Binds and starts serving; returns immediately.
    ///
    /// `None` means the bind failed and the failure handler has already
    /// been told.
    pub fn start(mut self) -> Option<ServerHandle> {
        let failure_handler = self.failure_handler.take().unwrap_or_else(Server::default_failure_handler);
        let failure_responder = self.failure_responder.take();
        let port = self.port;
        let backlog = self.backlog;

        info!(routes = ?self.router.paths(), "starting http server");

        let mut service = ConnectionService::new(self.into_responder());
        if let Some(failure_responder) = failure_responder {
            service = service.with_failure_responder(failure_responder);
        }

        let server = Server::builder()
            .port(port)
            .backlog(backlog)
            .service(service)
            .build()
            .expect("the connection service is always set");

        server.start(failure_handler)
    }
}
