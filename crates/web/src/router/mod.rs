//! Path/method routing.
//!
//! A [`RouterBuilder`] accumulates immutable route specifications — verbs,
//! groups, resourceful sugar — and is consumed exactly once by
//! [`RouterBuilder::build`] to produce an immutable [`Router`]. Nothing is
//! added, removed or mutated after construction; the router is shared
//! read-only across all connection workers.
//!
//! Matching is exact and literal: the request path is looked up as a string
//! key, and `:param`-style segments in a pattern are opaque literals — a
//! request matches them only by spelling them out. Registering the same
//! `(path, method)` pair twice is a build-time error, so precedence between
//! overlapping registrations never depends on map iteration order.

mod resource;

pub use resource::ResourceResponder;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use http::{Method, StatusCode};
use thiserror::Error;

use skiff_http::protocol::{Request, Response};
use skiff_http::responder::{BoxError, Responder, make_responder};

/// The immutable route table: path → per-method dispatch, plus the global
/// not-found fallback.
pub struct Router {
    routes: BTreeMap<String, MethodRouter>,
    not_found: Arc<dyn Responder>,
}

/// Per-path dispatch: method → responder, plus the method-not-allowed
/// fallback for the path.
struct MethodRouter {
    responders: HashMap<Method, Arc<dyn Responder>>,
    method_not_allowed: Arc<dyn Responder>,
}

impl MethodRouter {
    fn new() -> Self {
        Self {
            responders: HashMap::new(),
            method_not_allowed: Arc::new(make_responder(|_| async { Ok(Response::new(StatusCode::METHOD_NOT_ALLOWED)) })),
        }
    }
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new("")
    }

    /// Every registered path, in table order.
    pub fn paths(&self) -> Vec<&str> {
        self.routes.keys().map(String::as_str).collect()
    }
}

/// Routing misses are normal control flow: an unknown path resolves to the
/// not-found responder (404 by default) and an unregistered method on a
/// known path to the per-path 405 responder — neither is an error.
#[async_trait]
impl Responder for Router {
    async fn respond(&self, request: Request) -> Result<Response, BoxError> {
        match self.routes.get(request.path()) {
            None => self.not_found.respond(request).await,
            Some(method_router) => match method_router.responders.get(request.method()) {
                None => method_router.method_not_allowed.respond(request).await,
                Some(responder) => responder.respond(request).await,
            },
        }
    }
}

/// One accumulated registration: a literal path, the methods it accepts and
/// the responder they dispatch to.
struct RouteSpec {
    path: String,
    methods: Vec<Method>,
    responder: Arc<dyn Responder>,
}

/// Builder for [`Router`].
pub struct RouterBuilder {
    base_path: String,
    routes: Vec<RouteSpec>,
    fallback: Option<Arc<dyn Responder>>,
}

impl RouterBuilder {
    fn new(base_path: impl Into<String>) -> Self {
        Self { base_path: base_path.into(), routes: Vec::new(), fallback: None }
    }

    pub(crate) fn route(mut self, path: &str, methods: Vec<Method>, responder: Arc<dyn Responder>) -> Self {
        let path = format!("{}{}", self.base_path, path);
        self.routes.push(RouteSpec { path, methods, responder });
        self
    }

    pub fn get(self, path: &str, responder: impl Responder + 'static) -> Self {
        self.route(path, vec![Method::GET], Arc::new(responder))
    }

    pub fn post(self, path: &str, responder: impl Responder + 'static) -> Self {
        self.route(path, vec![Method::POST], Arc::new(responder))
    }

    pub fn put(self, path: &str, responder: impl Responder + 'static) -> Self {
        self.route(path, vec![Method::PUT], Arc::new(responder))
    }

    pub fn patch(self, path: &str, responder: impl Responder + 'static) -> Self {
        self.route(path, vec![Method::PATCH], Arc::new(responder))
    }

    pub fn delete(self, path: &str, responder: impl Responder + 'static) -> Self {
        self.route(path, vec![Method::DELETE], Arc::new(responder))
    }

    /// Registers `responder` for GET, POST, PUT, PATCH and DELETE at once.
    pub fn any(self, path: &str, responder: impl Responder + 'static) -> Self {
        self.route(
            path,
            vec![Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE],
            Arc::new(responder),
        )
    }

    /// Replaces the global not-found responder (404 by default).
    pub fn fallback(mut self, responder: impl Responder + 'static) -> Self {
        self.fallback = Some(Arc::new(responder));
        self
    }

    /// Scopes registrations under a path prefix.
    ///
    /// The group's effective paths are `outer base + inner base + path`;
    /// groups nest arbitrarily.
    pub fn group(mut self, base_path: &str, build: impl FnOnce(RouterBuilder) -> RouterBuilder) -> Self {
        let group = build(RouterBuilder::new(format!("{}{}", self.base_path, base_path)));
        self.routes.extend(group.routes);
        self
    }

    /// Consumes the builder into an immutable [`Router`].
    ///
    /// Registering the same `(path, method)` pair twice is rejected here,
    /// deterministically, rather than leaving the winner to map order.
    pub fn build(self) -> Result<Router, RouterBuildError> {
        let mut routes: BTreeMap<String, MethodRouter> = BTreeMap::new();

        for spec in self.routes {
            let method_router = routes.entry(spec.path.clone()).or_insert_with(MethodRouter::new);
            for method in spec.methods {
                let replaced = method_router.responders.insert(method.clone(), Arc::clone(&spec.responder));
                if replaced.is_some() {
                    return Err(RouterBuildError::DuplicateRoute { path: spec.path, method });
                }
            }
        }

        let not_found = self
            .fallback
            .unwrap_or_else(|| Arc::new(make_responder(|_| async { Ok(Response::new(StatusCode::NOT_FOUND)) })));

        Ok(Router { routes, not_found })
    }
}

#[derive(Debug, Error)]
pub enum RouterBuildError {
    #[error("route {method} {path} is registered twice")]
    DuplicateRoute { path: String, method: Method },
}
