use std::fmt;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use http::StatusCode;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{error, info};

use crate::codec::{RequestDecoder, ResponseEncoder};
use crate::protocol::{Body, HttpError, Request, Response};
use crate::responder::{BoxError, Responder};

/// Default capacity of the buffered read chunk per parse attempt.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 80 * 1024;

type ResponderForRequest = dyn Fn(&Request) -> Arc<dyn Responder> + Send + Sync;
type KeepConnectionForRequest = dyn Fn(&Request) -> bool + Send + Sync;
type FailureResponder = dyn Fn(&BoxError) -> Response + Send + Sync;

/// What a connection needs to turn requests into responses.
///
/// Bundles the three caller-supplied decisions of the serve loop: which
/// responder handles a just-parsed request, whether the connection is kept
/// for another exchange afterwards, and how a responder failure maps to a
/// response.
pub struct ConnectionService {
    responder_for_request: Box<ResponderForRequest>,
    keep_connection_for_request: Box<KeepConnectionForRequest>,
    failure_responder: Box<FailureResponder>,
}

impl ConnectionService {
    /// A service that always dispatches to `responder`, keeps the connection
    /// per the request's own keep-alive decision, and maps responder errors
    /// to [`default_failure_responder`].
    pub fn new(responder: Arc<dyn Responder>) -> Self {
        Self {
            responder_for_request: Box::new(move |_: &Request| Arc::clone(&responder)),
            keep_connection_for_request: Box::new(Request::keep_alive),
            failure_responder: Box::new(default_failure_responder),
        }
    }

    /// Chooses the responder from the just-parsed request instead of using a
    /// fixed one. The indirection lets the caller pick a responder based on
    /// request content before it is invoked.
    pub fn with_responder_for_request<F>(mut self, f: F) -> Self
    where
        F: Fn(&Request) -> Arc<dyn Responder> + Send + Sync + 'static,
    {
        self.responder_for_request = Box::new(f);
        self
    }

    pub fn with_keep_connection_for_request<F>(mut self, f: F) -> Self
    where
        F: Fn(&Request) -> bool + Send + Sync + 'static,
    {
        self.keep_connection_for_request = Box::new(f);
        self
    }

    pub fn with_failure_responder<F>(mut self, f: F) -> Self
    where
        F: Fn(&BoxError) -> Response + Send + Sync + 'static,
    {
        self.failure_responder = Box::new(f);
        self
    }
}

impl fmt::Debug for ConnectionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionService").finish_non_exhaustive()
    }
}

/// Maps a responder failure to `500 Internal Server Error` with the error
/// description as a plain-text body.
pub fn default_failure_responder(error: &BoxError) -> Response {
    Response::with_body(StatusCode::INTERNAL_SERVER_ERROR, Body::text(error.to_string()))
}

/// An HTTP connection owning one accepted socket exclusively.
///
/// Drives the per-connection lifecycle: parse a request, resolve and invoke
/// the responder, serialize the response, then either loop for the next
/// request (keep-alive) or close.
///
/// # Type Parameters
///
/// * `R`: the async readable half
/// * `W`: the async writable half
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    framed_write: FramedWrite<W, ResponseEncoder>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_read_buffer_size(reader, writer, DEFAULT_READ_BUFFER_SIZE)
    }

    pub fn with_read_buffer_size(reader: R, writer: W, read_buffer_size: usize) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, RequestDecoder::new(), read_buffer_size),
            framed_write: FramedWrite::new(writer, ResponseEncoder::new()),
        }
    }

    /// Serves request/response exchanges until the peer closes, the
    /// keep-alive decision says stop, or the transport fails.
    ///
    /// Responder failures are translated by the service's failure responder
    /// and do not close the connection by themselves; parse and write
    /// failures do, surfacing as the returned [`HttpError`].
    pub async fn serve(mut self, service: &ConnectionService) -> Result<(), HttpError> {
        loop {
            let request = match self.framed_read.next().await {
                Some(Ok(request)) => request,
                Some(Err(e)) => return Err(e.into()),
                None => {
                    info!("peer closed the connection");
                    return Ok(());
                }
            };

            let keep_connection = (service.keep_connection_for_request)(&request);
            let responder = (service.responder_for_request)(&request);

            let response = match responder.respond(request).await {
                Ok(response) => response,
                Err(e) => {
                    error!(cause = %e, "responder failed, sending failure response");
                    (service.failure_responder)(&e)
                }
            };

            self.framed_write.send(response).await?;

            if !keep_connection {
                info!("closing connection");
                return Ok(());
            }
        }
    }
}
