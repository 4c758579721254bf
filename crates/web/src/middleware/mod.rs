//! Middleware: transformations from one responder to another.
//!
//! A middleware wraps a responder and returns a new one, injecting
//! cross-cutting behavior around the inner call. Chains are explicit
//! ordered lists folded once at build time by [`compose`] — there is no
//! per-request composition.

mod default_headers;
mod keep_alive;

pub use default_headers::DefaultHeaders;
pub use keep_alive::KeepAlive;

use std::sync::Arc;

use skiff_http::responder::Responder;

/// A transformation from one responder to another.
pub trait Middleware: Send + Sync {
    fn wrap(&self, inner: Arc<dyn Responder>) -> Arc<dyn Responder>;
}

/// Folds an ordered middleware list around a base responder.
///
/// The first element of `middlewares` becomes the outermost wrapper:
/// `compose(&[a, b], inner)` runs a's pre-logic, then b's, then `inner`,
/// then b's post-logic, then a's. The fold is associative and happens
/// exactly once, at chain-build time.
pub fn compose(middlewares: &[Arc<dyn Middleware>], base: Arc<dyn Responder>) -> Arc<dyn Responder> {
    middlewares.iter().rev().fold(base, |inner, middleware| middleware.wrap(inner))
}
