use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, trace, warn};

use crate::http::error::{ConnectionError, ParseError};
use crate::http::framing::{self, Framing};
use crate::http::handler::{self, Handler};
use crate::http::message::Message;
use crate::http::parser::{find_head_end, parse_head};
use crate::http::status::{INTERNAL_SERVER_ERROR, NOT_ACCEPTABLE};
use crate::http::writer::ResponseWriter;

pub const DEFAULT_MAX_HEAD_BYTES: usize = 64 * 1024;
pub const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

const INITIAL_BUFFER_SIZE: usize = 4096;

/// One accepted connection, from the first byte read to close.
///
/// The connection owns its stream, its read buffer and both messages, so
/// nothing it touches across an `.await` can be dropped underneath it.
pub struct Connection<S, H: ?Sized> {
    stream: S,
    buffer: BytesMut,
    handler: Arc<H>,
    max_head_bytes: usize,
    max_body_bytes: usize,
    state: ConnectionState,
}

#[derive(Debug)]
pub enum ConnectionState {
    AwaitingHead,
    ReadingBody { request: Message, framing: Framing },
    Parsed(Message),
    Handled(ResponseWriter),
    Written,
    Failed(ParseError),
    Closed,
}

impl<S, H> Connection<S, H>
where
    S: AsyncRead + AsyncWrite + Unpin,
    H: Handler + ?Sized,
{
    pub fn new(stream: S, handler: Arc<H>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(INITIAL_BUFFER_SIZE),
            handler,
            max_head_bytes: DEFAULT_MAX_HEAD_BYTES,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            state: ConnectionState::AwaitingHead,
        }
    }

    /// Caps how many bytes may arrive before the blank line that ends the head.
    pub fn with_max_head_bytes(mut self, max_head_bytes: usize) -> Self {
        self.max_head_bytes = max_head_bytes;
        self
    }

    /// Caps the `Content-Length` a request may declare.
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Drives the connection to `Closed`.
    ///
    /// Malformed input still gets a 406 response and returns `Ok`. Errors are
    /// returned only when the connection is aborted without a response.
    pub async fn run(&mut self) -> Result<(), ConnectionError> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::AwaitingHead => self.read_head().await?,

                ConnectionState::ReadingBody { request, framing } => {
                    self.read_body(request, framing).await?
                }

                ConnectionState::Parsed(request) => self.handle(request),

                ConnectionState::Failed(e) => {
                    warn!(error = %e, "Rejecting malformed request");
                    let response = Message::response(NOT_ACCEPTABLE);
                    ConnectionState::Handled(ResponseWriter::new(&response))
                }

                ConnectionState::Handled(mut writer) => {
                    match writer.write_to_stream(&mut self.stream).await {
                        Ok(()) => debug!(bytes = writer.written(), "Response sent"),
                        Err(e) => error!(
                            error = %e,
                            written = writer.written(),
                            total = writer.bytes().len(),
                            "Failed to write response"
                        ),
                    }
                    ConnectionState::Written
                }

                ConnectionState::Written => {
                    if let Err(e) = self.stream.shutdown().await {
                        debug!(error = %e, "Shutdown after response failed");
                    }
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }

    async fn read_head(&mut self) -> Result<ConnectionState, ConnectionError> {
        loop {
            if let Some(head_end) = find_head_end(&self.buffer) {
                return Ok(self.parse_head(head_end));
            }

            if self.buffer.len() > self.max_head_bytes {
                return Ok(ConnectionState::Failed(ParseError::new(
                    self.buffer.len(),
                    format!("head exceeds {} bytes", self.max_head_bytes),
                )));
            }

            let n = self.stream.read_buf(&mut self.buffer).await?;
            debug!(bytes = n, buffered = self.buffer.len(), "Read head bytes");

            if n == 0 {
                if self.buffer.is_empty() {
                    trace!("Peer closed before sending a request");
                    return Ok(ConnectionState::Closed);
                }
                // No blank line arrived, so this always fails to parse.
                let len = self.buffer.len();
                return Ok(self.parse_head(len));
            }
        }
    }

    /// Splits the head off the buffer; whatever remains is body.
    fn parse_head(&mut self, head_end: usize) -> ConnectionState {
        let head = self.buffer.split_to(head_end);

        let request = match parse_head(&head) {
            Ok((request, _)) => request,
            Err(e) => return ConnectionState::Failed(e),
        };

        match framing::resolve(&request, self.buffer.len(), self.max_body_bytes) {
            Ok(framing) if framing.is_complete() => {
                ConnectionState::Parsed(self.take_body(request, framing.content_length))
            }
            Ok(framing) => ConnectionState::ReadingBody { request, framing },
            Err(e) => ConnectionState::Failed(e),
        }
    }

    /// Reads exactly the missing body bytes and nothing past them.
    async fn read_body(
        &mut self,
        request: Message,
        framing: Framing,
    ) -> Result<ConnectionState, ConnectionError> {
        debug!(
            content_length = framing.content_length,
            remaining = framing.remaining,
            "Reading body"
        );

        while self.buffer.len() < framing.content_length {
            let missing = (framing.content_length - self.buffer.len()) as u64;
            let n = (&mut self.stream)
                .take(missing)
                .read_buf(&mut self.buffer)
                .await?;

            if n == 0 {
                return Err(ConnectionError::FramingShortRead {
                    expected: framing.content_length,
                    received: self.buffer.len(),
                });
            }
        }

        Ok(ConnectionState::Parsed(
            self.take_body(request, framing.content_length),
        ))
    }

    fn take_body(&mut self, mut request: Message, content_length: usize) -> Message {
        request.payload = self.buffer.split_to(content_length).freeze();
        // one request per connection, anything past the body is dropped
        self.buffer.clear();
        request
    }

    fn handle(&self, request: Message) -> ConnectionState {
        trace!(?request, "Request");

        let mut response = Message::default();
        if !handler::invoke(self.handler.as_ref(), &request, &mut response) {
            error!(method = %request.method, uri = %request.uri, "Handler panicked");
        } else if response.is_request() {
            warn!(uri = %request.uri, "Handler left the status unset");
            response.status = INTERNAL_SERVER_ERROR;
        }

        trace!(?response, "Response");
        ConnectionState::Handled(ResponseWriter::new(&response))
    }
}
