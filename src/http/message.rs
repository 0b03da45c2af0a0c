use std::fmt;

use bytes::Bytes;

use crate::http::error::ParseError;

/// Protocol version carried on the start line, `HTTP/MAJOR.MINOR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Default for Version {
    fn default() -> Self {
        Self { major: 1, minor: 1 }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP/{}.{}", self.major, self.minor)
    }
}

/// Header block of a message.
///
/// Names are unique and compared case-insensitively. Inserting a name that
/// already exists replaces the entry in place, so the last value wins while
/// the position of the first occurrence is kept. Iteration follows insertion
/// order, which keeps serialized output deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a header, returning the previous value if any.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();

        match self.position(&name) {
            Some(idx) => {
                let entry = &mut self.entries[idx];
                entry.0 = name;
                Some(std::mem::replace(&mut entry.1, value))
            }
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Looks up a header value by name, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|idx| self.entries[idx].1.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|idx| self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// A single HTTP message, either a request or a response.
///
/// The two shapes share one type so that parsing and serialization stay
/// symmetric. A `status` of `0` means the message is a request and
/// `method`/`uri` are meaningful; any other value makes it a response.
///
/// `Date` and `Content-Length` are always computed when the message is
/// written. Values stored under those names in `headers` are ignored.
///
/// # Example
///
/// ```
/// # use wicket::http::message::Message;
/// let req = Message::request("GET", "/index.html");
/// assert!(req.is_request());
///
/// let resp = Message::response(200);
/// assert!(resp.is_response());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub version: Version,
    /// `0` for requests, the status code for responses.
    pub status: u16,
    pub method: String,
    pub uri: String,
    /// Explicit reason phrase. When empty, the standard phrase for `status`
    /// is used on the wire.
    pub reason: String,
    pub headers: Headers,
    /// Body bytes, never interpreted beyond their length.
    pub payload: Bytes,
}

impl Message {
    pub fn request(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            ..Self::default()
        }
    }

    pub fn response(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn is_request(&self) -> bool {
        self.status == 0
    }

    pub fn is_response(&self) -> bool {
        self.status != 0
    }

    /// The declared body length, if a `Content-Length` header is present.
    ///
    /// The value must be one or more ASCII digits; signs and whitespace are
    /// rejected.
    pub fn content_length(&self) -> Result<Option<usize>, ParseError> {
        let Some(value) = self.headers.get("Content-Length") else {
            return Ok(None);
        };

        let invalid = || ParseError::new(0, format!("invalid Content-Length '{value}'"));
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        value.parse().map(Some).map_err(|_| invalid())
    }

    /// Parses a complete message; trailing bytes after the head become the payload.
    pub fn parse(buf: &[u8]) -> Result<Self, ParseError> {
        crate::http::parser::parse_message(buf)
    }

    /// Renders the message to wire bytes.
    pub fn to_bytes(&self) -> Bytes {
        crate::http::writer::serialize(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_first_position() {
        let mut headers = Headers::new();
        headers.insert("A", "1");
        headers.insert("B", "2");
        assert_eq!(headers.insert("a", "3"), Some("1".to_string()));

        let entries: Vec<_> = headers.iter().collect();
        assert_eq!(entries, vec![("a", "3"), ("B", "2")]);
    }

    #[test]
    fn version_display() {
        assert_eq!(Version::default().to_string(), "HTTP/1.1");
        assert_eq!(Version { major: 1, minor: 0 }.to_string(), "HTTP/1.0");
    }
}
