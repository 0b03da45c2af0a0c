//! Body framing by `Content-Length`.
//!
//! Only length-delimited bodies are supported. Without a `Content-Length`
//! header the body is empty and any bytes after the head are ignored.

use crate::http::error::ParseError;
use crate::http::message::Message;

/// How much body a message has and how much of it is still on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Framing {
    /// Total body length declared by the head.
    pub content_length: usize,
    /// Bytes that still have to be read before the body is complete.
    pub remaining: usize,
}

impl Framing {
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}

/// Resolves the body framing of a parsed head.
///
/// `buffered` is the number of body bytes that arrived together with the
/// head. Surplus buffered bytes never make `remaining` negative. A declared
/// length above `max_body_bytes` is rejected before any body byte is read.
/// Errors carry position 0.
///
/// # Example
///
/// ```
/// # use wicket::http::framing::resolve;
/// # use wicket::http::message::Message;
/// let mut head = Message::request("POST", "/upload");
/// head.headers.insert("Content-Length", "10");
///
/// let framing = resolve(&head, 4, 1024).unwrap();
/// assert_eq!(framing.content_length, 10);
/// assert_eq!(framing.remaining, 6);
///
/// assert!(resolve(&head, 4, 8).is_err());
/// ```
pub fn resolve(
    head: &Message,
    buffered: usize,
    max_body_bytes: usize,
) -> Result<Framing, ParseError> {
    let content_length = head.content_length()?.unwrap_or(0);

    if content_length > max_body_bytes {
        return Err(ParseError::new(
            0,
            format!("Content-Length {content_length} exceeds {max_body_bytes} bytes"),
        ));
    }

    Ok(Framing {
        content_length,
        remaining: content_length.saturating_sub(buffered),
    })
}
