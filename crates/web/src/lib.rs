//! The web-facing half of skiff: routing, middleware and an ergonomic
//! server facade over [`skiff_http`].
//!
//! # Overview
//!
//! - [`router`]: an immutable path/method route table built once at startup,
//!   with route groups and resourceful CRUD sugar
//! - [`middleware`]: responder-to-responder transformations folded into a
//!   single chain at build time, plus the built-in keep-alive and
//!   default-header layers
//! - [`server::HttpServer`]: wires a router and middlewares into the core
//!   connection server
//! - [`json`]: `application/json` body sugar over serde
//!
//! # Example
//!
//! ```no_run
//! use http::StatusCode;
//! use skiff_http::protocol::{Body, Response};
//! use skiff_http::responder::make_responder;
//! use skiff_web::router::Router;
//! use skiff_web::server::HttpServer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let router = Router::builder()
//!         .get("/hello", make_responder(|_| async {
//!             Ok(Response::with_body(StatusCode::OK, Body::text("hello\r\n")))
//!         }))
//!         .build()
//!         .expect("no duplicate routes");
//!
//!     let handle = HttpServer::builder()
//!         .router(router)
//!         .port(8080)
//!         .build()
//!         .expect("a router was set")
//!         .start()
//!         .expect("bind failed");
//!
//!     tokio::signal::ctrl_c().await.ok();
//!     handle.stop();
//! }
//! ```

pub mod date;
pub mod json;
pub mod middleware;
pub mod router;
pub mod server;

pub use json::{Json, JsonBodyError};
pub use middleware::{DefaultHeaders, KeepAlive, Middleware};
pub use router::{ResourceResponder, Router, RouterBuildError, RouterBuilder};
pub use server::HttpServer;
