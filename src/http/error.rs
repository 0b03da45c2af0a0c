use std::io;
use thiserror::Error;

/// A message that does not match the grammar.
///
/// There is a single kind of parse failure: the message is malformed.
/// `position` is the byte offset at which matching stopped. Framing errors
/// (a bad or oversized `Content-Length`) are found after the head has been
/// parsed and carry no offset; their `position` is always 0.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed message at byte {position}: {message}")]
pub struct ParseError {
    pub position: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Failures that abort a connection without a response.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("peer closed after {received} of {expected} body bytes")]
    FramingShortRead { expected: usize, received: usize },

    #[error("transport error: {0}")]
    Transport(#[from] io::Error),
}
