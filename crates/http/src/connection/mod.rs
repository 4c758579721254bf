//! Core connection handling and lifecycle management.

mod http_connection;

pub use http_connection::{ConnectionService, DEFAULT_READ_BUFFER_SIZE, HttpConnection, default_failure_responder};
