//! The connection server: owns the listening socket, accepts connections
//! and spawns one independent worker per connection.
//!
//! [`Server::start`] binds and listens, then returns immediately; the accept
//! loop runs as its own task. Each accepted connection is handed to a
//! spawned worker that owns it exclusively, so the accept loop never blocks
//! on request processing and a failing connection never affects another.
//!
//! Shutdown is best-effort: [`ServerHandle::stop`] drops the listening
//! socket and nothing else. In-flight workers run to completion and idle
//! keep-alive peers are not reaped — there are no read/write timeouts. A
//! deployment that needs draining has to layer it on top.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::{TcpListener, TcpSocket};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::connection::{ConnectionService, DEFAULT_READ_BUFFER_SIZE, HttpConnection};
use crate::protocol::HttpError;
use crate::responder::Responder;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BACKLOG: u32 = 1000;

/// Invoked for transport-level failures: bind, accept, and per-connection
/// parse/write errors. Responder failures never reach this — they go
/// through the connection service's failure responder instead.
pub type FailureHandler = Arc<dyn Fn(&ServerError) + Send + Sync>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("bind error: {source}")]
    Bind {
        #[source]
        source: io::Error,
    },

    #[error("accept error: {source}")]
    Accept {
        #[source]
        source: io::Error,
    },

    #[error("connection error: {source}")]
    Connection {
        #[from]
        source: HttpError,
    },
}

#[derive(Debug, Error)]
pub enum ServerBuildError {
    #[error("a responder or connection service must be set")]
    MissingResponder,
}

/// Listening socket configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    port: u16,
    backlog: u32,
    read_buffer_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT, backlog: DEFAULT_BACKLOG, read_buffer_size: DEFAULT_READ_BUFFER_SIZE }
    }
}

#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    service: Arc<ConnectionService>,
}

#[derive(Debug, Default)]
pub struct ServerBuilder {
    config: ServerConfig,
    service: Option<ConnectionService>,
}

impl ServerBuilder {
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn backlog(mut self, backlog: u32) -> Self {
        self.config.backlog = backlog;
        self
    }

    pub fn read_buffer_size(mut self, read_buffer_size: usize) -> Self {
        self.config.read_buffer_size = read_buffer_size;
        self
    }

    /// Serves every request with `responder`, using the default keep-alive
    /// decision and failure responder.
    pub fn responder(self, responder: impl Responder + 'static) -> Self {
        self.service(ConnectionService::new(Arc::new(responder)))
    }

    /// Full control over responder resolution, keep-alive and failure
    /// translation.
    pub fn service(mut self, service: ConnectionService) -> Self {
        self.service = Some(service);
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let service = self.service.ok_or(ServerBuildError::MissingResponder)?;
        Ok(Server { config: self.config, service: Arc::new(service) })
    }
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// A failure handler that logs and nothing else.
    pub fn default_failure_handler() -> FailureHandler {
        Arc::new(|failure: &ServerError| error!(cause = %failure, "server failure"))
    }

    /// Binds the listening socket and starts accepting connections.
    ///
    /// On bind/listen failure the failure handler is invoked synchronously
    /// and `None` is returned: nothing is served. On success the accept
    /// loop is spawned and the call returns immediately with a handle.
    pub fn start(self, failure_handler: FailureHandler) -> Option<ServerHandle> {
        let listener = match bind(&self.config) {
            Ok(listener) => listener,
            Err(e) => {
                failure_handler(&ServerError::Bind { source: e });
                return None;
            }
        };

        let local_addr = match listener.local_addr() {
            Ok(local_addr) => local_addr,
            Err(e) => {
                failure_handler(&ServerError::Bind { source: e });
                return None;
            }
        };

        info!(%local_addr, backlog = self.config.backlog, "server listening");

        let read_buffer_size = self.config.read_buffer_size;
        let accept_task = tokio::spawn(accept_loop(listener, self.service, read_buffer_size, failure_handler));

        Some(ServerHandle { accept_task, local_addr })
    }
}

fn bind(config: &ServerConfig) -> io::Result<TcpListener> {
    let socket = TcpSocket::new_v4()?;
    socket.set_reuseaddr(true)?;
    socket.bind(SocketAddr::from(([0, 0, 0, 0], config.port)))?;
    socket.listen(config.backlog)
}

async fn accept_loop(
    listener: TcpListener,
    service: Arc<ConnectionService>,
    read_buffer_size: usize,
    failure_handler: FailureHandler,
) {
    loop {
        let (stream, remote_addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                // the listening socket is gone; in-flight workers keep running
                failure_handler(&ServerError::Accept { source: e });
                return;
            }
        };

        let service = Arc::clone(&service);
        let failure_handler = Arc::clone(&failure_handler);

        tokio::spawn(async move {
            let (reader, writer) = stream.into_split();
            let connection = HttpConnection::with_read_buffer_size(reader, writer, read_buffer_size);
            match connection.serve(&service).await {
                Ok(()) => info!(%remote_addr, "finished processing, connection shutdown"),
                Err(e) => {
                    error!(%remote_addr, cause = %e, "connection failed");
                    failure_handler(&ServerError::Connection { source: e });
                }
            }
        });
    }
}

/// Handle to a started server.
#[derive(Debug)]
pub struct ServerHandle {
    accept_task: JoinHandle<()>,
    local_addr: SocketAddr,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting connections by dropping the listening socket.
    ///
    /// In-flight connection workers are not cancelled and keep serving
    /// their peers.
    pub fn stop(&self) {
        self.accept_task.abort();
        info!("server stopped accepting connections");
    }
}
