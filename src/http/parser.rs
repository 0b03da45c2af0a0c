//! Grammar for a single HTTP/1.1 message head.
//!
//! ```text
//! message      = start-line CRLF *( header CRLF ) CRLF payload
//! start-line   = request-line / status-line        ; ordered, request first
//! request-line = method SP uri SP version
//! status-line  = version SP 3DIGIT SP reason
//! method       = 1*UPPER
//! uri          = 1*( ALNUM / ";" / "/" / "?" / ":" / "@" / "&" / "=" / "+"
//!                   / "$" / "," / "-" / "_" / "." / "!" / "~" / "*" / "'"
//!                   / "(" / ")" )
//! version      = "HTTP/" 1*DIGIT "." 1*DIGIT
//! reason       = *( PRINT )
//! header       = name ": " value
//! name         = 1*( ALPHA / "-" )
//! value        = 1*PRINT
//! payload      = *OCTET
//! ```
//!
//! PRINT is `0x20..=0x7E`. Each alternative either matches completely or
//! rewinds, so a failed request-line never leaves partial state behind.

use bytes::Bytes;

use crate::http::error::ParseError;
use crate::http::message::{Message, Version};

const HEAD_DELIMITER: &[u8] = b"\r\n\r\n";
const CRLF: &[u8] = b"\r\n";
const URI_SAFE: &[u8] = b";/?:@&=+$,-_.!~*'()";

/// Parses a full message. Everything after the blank line is the payload.
pub fn parse_message(buf: &[u8]) -> Result<Message, ParseError> {
    let mut cursor = Cursor::new(buf);
    let mut message = head(&mut cursor)?;
    message.payload = Bytes::copy_from_slice(cursor.rest());
    Ok(message)
}

/// Parses only the head and returns it with the number of bytes it spans.
///
/// The returned message has an empty payload; bytes past the head are left
/// for the caller to frame.
pub fn parse_head(buf: &[u8]) -> Result<(Message, usize), ParseError> {
    let mut cursor = Cursor::new(buf);
    let message = head(&mut cursor)?;
    Ok((message, cursor.pos))
}

/// Offset one past the `\r\n\r\n` that ends the head, if present.
pub fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEAD_DELIMITER.len())
        .position(|w| w == HEAD_DELIMITER)
        .map(|pos| pos + HEAD_DELIMITER.len())
}

enum StartLine {
    Request {
        method: String,
        uri: String,
        version: Version,
    },
    Status {
        version: Version,
        status: u16,
        reason: String,
    },
}

fn head(cursor: &mut Cursor<'_>) -> Result<Message, ParseError> {
    let mut message = Message::default();

    match cursor.attempt(start_line) {
        Some(StartLine::Request {
            method,
            uri,
            version,
        }) => {
            message.method = method;
            message.uri = uri;
            message.version = version;
        }
        Some(StartLine::Status {
            version,
            status,
            reason,
        }) => {
            message.version = version;
            message.status = status;
            message.reason = reason;
        }
        None => {
            return Err(ParseError::new(
                cursor.pos,
                "expected request-line or status-line",
            ));
        }
    }

    while let Some((name, value)) = cursor.attempt(header_line) {
        message.headers.insert(name, value);
    }

    if !cursor.eat(CRLF) {
        let what = if cursor.at_end() {
            "missing terminating blank line"
        } else {
            "malformed header line"
        };
        return Err(ParseError::new(cursor.pos, what));
    }

    Ok(message)
}

fn start_line(cursor: &mut Cursor<'_>) -> Option<StartLine> {
    cursor
        .attempt(request_line)
        .or_else(|| cursor.attempt(status_line))
}

fn request_line(cursor: &mut Cursor<'_>) -> Option<StartLine> {
    let method = cursor.take_while1(|b| b.is_ascii_uppercase())?;
    cursor.expect(b" ")?;
    let uri = cursor.take_while1(|b| b.is_ascii_alphanumeric() || URI_SAFE.contains(&b))?;
    cursor.expect(b" ")?;
    let version = version(cursor)?;
    cursor.expect(CRLF)?;

    Some(StartLine::Request {
        method: ascii(method),
        uri: ascii(uri),
        version,
    })
}

fn status_line(cursor: &mut Cursor<'_>) -> Option<StartLine> {
    let version = version(cursor)?;
    cursor.expect(b" ")?;
    let code = cursor.take_n(3, |b| b.is_ascii_digit())?;
    cursor.expect(b" ")?;
    let reason = cursor.take_while(is_print);
    cursor.expect(CRLF)?;

    // 000 would read back as a request
    let status: u16 = ascii(code).parse().ok()?;
    if status == 0 {
        return None;
    }

    Some(StartLine::Status {
        version,
        status,
        reason: ascii(reason),
    })
}

fn version(cursor: &mut Cursor<'_>) -> Option<Version> {
    cursor.expect(b"HTTP/")?;
    let major = cursor.take_while1(|b| b.is_ascii_digit())?;
    cursor.expect(b".")?;
    let minor = cursor.take_while1(|b| b.is_ascii_digit())?;

    Some(Version {
        major: ascii(major).parse().ok()?,
        minor: ascii(minor).parse().ok()?,
    })
}

fn header_line(cursor: &mut Cursor<'_>) -> Option<(String, String)> {
    let name = cursor.take_while1(|b| b.is_ascii_alphabetic() || b == b'-')?;
    cursor.expect(b": ")?;
    let value = cursor.take_while1(is_print)?;
    cursor.expect(CRLF)?;
    Some((ascii(name), ascii(value)))
}

fn is_print(b: u8) -> bool {
    (0x20..=0x7e).contains(&b)
}

// Every token the grammar accepts is printable ASCII.
fn ascii(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Runs `rule`, rewinding to the current position if it does not match.
    fn attempt<T>(&mut self, rule: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let start = self.pos;
        let matched = rule(self);
        if matched.is_none() {
            self.pos = start;
        }
        matched
    }

    fn eat(&mut self, literal: &[u8]) -> bool {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, literal: &[u8]) -> Option<()> {
        self.eat(literal).then_some(())
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a [u8] {
        let rest = self.rest();
        let len = rest.iter().take_while(|&&b| pred(b)).count();
        self.pos += len;
        &rest[..len]
    }

    fn take_while1(&mut self, pred: impl Fn(u8) -> bool) -> Option<&'a [u8]> {
        let taken = self.take_while(pred);
        (!taken.is_empty()).then_some(taken)
    }

    fn take_n(&mut self, n: usize, pred: impl Fn(u8) -> bool) -> Option<&'a [u8]> {
        let rest = self.rest();
        if rest.len() < n || !rest[..n].iter().all(|&b| pred(b)) {
            return None;
        }
        self.pos += n;
        Some(&rest[..n])
    }
}
