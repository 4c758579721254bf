//! A minimal asynchronous HTTP/1.1 server toolkit
//!
//! This crate provides the wire-level half of skiff: parsing requests off a
//! TCP connection, dispatching them through a caller-supplied responder and
//! serializing responses back, with one concurrent worker per connection on
//! top of tokio.
//!
//! # Features
//!
//! - HTTP/1.1 (and 1.0) request parsing via an owned state-machine codec
//! - Content-Length framed bodies (no chunked transfer encoding)
//! - Keep-alive connections: sequential request/response exchanges on one
//!   connection, no pipelining
//! - Task-per-connection concurrency with an independent accept loop
//! - A uniform `Responder` contract with failure translation to HTTP 500
//! - Client-facing request encoder / response decoder for the same wire
//!
//! # Example
//!
//! ```no_run
//! use http::StatusCode;
//! use skiff_http::protocol::{Body, Request, Response};
//! use skiff_http::responder::make_responder;
//! use skiff_http::server::Server;
//! use tracing::Level;
//! use tracing_subscriber::FmtSubscriber;
//!
//! #[tokio::main]
//! async fn main() {
//!     let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
//!     tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
//!
//!     let responder = make_responder(|request: Request| async move {
//!         Ok(Response::with_body(StatusCode::OK, Body::text(format!("hello from {}", request.path()))))
//!     });
//!
//!     let server = Server::builder()
//!         .port(8080)
//!         .responder(responder)
//!         .build()
//!         .expect("a responder was set");
//!
//!     let handle = server.start(Server::default_failure_handler()).expect("bind failed");
//!
//!     // start() returns immediately; park the main task however fits
//!     tokio::signal::ctrl_c().await.ok();
//!     handle.stop();
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: request/response/body data model and the error taxonomy
//! - [`codec`]: the wire codec, both server- and client-facing halves
//! - [`connection`]: the per-connection serve loop
//! - [`responder`]: the handler contract
//! - [`server`]: listening socket ownership, accept loop, start/stop
//!
//! # Limitations
//!
//! - HTTP/1.1 and HTTP/1.0 only
//! - No TLS (terminate it in front)
//! - Bodies are buffered whole, framed by `content-length` only
//! - `stop()` only stops accepting; in-flight connections are not drained
//!   and idle peers are not timed out

pub mod codec;
pub mod connection;
pub mod protocol;
pub mod responder;
pub mod server;

mod utils;
pub(crate) use utils::ensure;
