use std::io;
use std::time::SystemTime;

use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::message::Message;
use crate::http::status::reason_phrase;

const CRLF: &[u8] = b"\r\n";

/// Renders a message to wire bytes, stamped with the current time.
pub fn serialize(message: &Message) -> Bytes {
    serialize_at(message, SystemTime::now())
}

/// Renders a message with an explicit `Date`.
///
/// Layout: start line, `Date`, `Content-Length`, the message headers in
/// insertion order, a blank line, then the payload with nothing after it.
/// Caller-set `Date` and `Content-Length` headers are skipped.
pub fn serialize_at(message: &Message, now: SystemTime) -> Bytes {
    let mut buf = BytesMut::with_capacity(256 + message.payload.len());

    let start_line = if message.is_request() {
        format!("{} {} {}", message.method, message.uri, message.version)
    } else {
        let reason = if message.reason.is_empty() {
            reason_phrase(message.status)
        } else {
            message.reason.as_str()
        };
        format!("{} {} {}", message.version, message.status, reason)
    };
    put_line(&mut buf, &start_line);

    // fmt_http_date keeps no shared scratch state
    put_header(&mut buf, "Date", &httpdate::fmt_http_date(now));
    put_header(&mut buf, "Content-Length", &message.payload.len().to_string());

    for (name, value) in message.headers.iter() {
        if is_computed(name) {
            continue;
        }
        put_header(&mut buf, name, value);
    }

    buf.put_slice(CRLF);
    buf.put_slice(&message.payload);

    buf.freeze()
}

fn is_computed(name: &str) -> bool {
    name.eq_ignore_ascii_case("Date") || name.eq_ignore_ascii_case("Content-Length")
}

fn put_line(buf: &mut BytesMut, line: &str) {
    buf.put_slice(line.as_bytes());
    buf.put_slice(CRLF);
}

fn put_header(buf: &mut BytesMut, name: &str, value: &str) {
    buf.put_slice(name.as_bytes());
    buf.put_slice(b": ");
    buf.put_slice(value.as_bytes());
    buf.put_slice(CRLF);
}

/// A serialized response and how much of it has reached the socket.
#[derive(Debug)]
pub struct ResponseWriter {
    buffer: Bytes,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Message) -> Self {
        Self {
            buffer: serialize(response),
            written: 0,
        }
    }

    pub fn bytes(&self) -> &Bytes {
        &self.buffer
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Writes the whole buffer, resuming after short writes.
    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "connection closed while writing",
                ));
            }

            self.written += n;
        }

        stream.flush().await
    }
}
