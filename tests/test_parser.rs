use wicket::http::message::{Message, Version};
use wicket::http::parser::{find_head_end, parse_head, parse_message};

#[test]
fn test_parse_simple_get_request() {
    let req = b"GET /index.html HTTP/1.1\r\nHost: x\r\n\r\n";
    let parsed = parse_message(req).unwrap();

    assert_eq!(parsed.status, 0);
    assert!(parsed.is_request());
    assert_eq!(parsed.method, "GET");
    assert_eq!(parsed.uri, "/index.html");
    assert_eq!(parsed.version, Version { major: 1, minor: 1 });
    assert_eq!(parsed.headers.get("Host"), Some("x"));
    assert_eq!(parsed.headers.len(), 1);
    assert!(parsed.payload.is_empty());
}

#[test]
fn test_parse_post_request_with_body() {
    let req = b"POST /api HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\n\r\nhello";
    let parsed = parse_message(req).unwrap();

    assert_eq!(parsed.method, "POST");
    assert_eq!(parsed.uri, "/api");
    assert_eq!(parsed.payload, &b"hello"[..]);
}

#[test]
fn test_parse_status_line() {
    let resp = b"HTTP/1.0 404 Not Found\r\nServer: wicket\r\n\r\ngone";
    let parsed = parse_message(resp).unwrap();

    assert!(parsed.is_response());
    assert_eq!(parsed.status, 404);
    assert_eq!(parsed.reason, "Not Found");
    assert_eq!(parsed.version, Version { major: 1, minor: 0 });
    assert_eq!(parsed.headers.get("Server"), Some("wicket"));
    assert_eq!(parsed.payload, &b"gone"[..]);
    assert!(parsed.method.is_empty());
    assert!(parsed.uri.is_empty());
}

#[test]
fn test_parse_status_zero_rejected() {
    let err = parse_message(b"HTTP/1.1 000 X\r\n\r\n").unwrap_err();
    assert_eq!(err.position, 0);
    assert!(err.message.contains("status-line"));
}

#[test]
fn test_parse_status_line_with_empty_reason() {
    let parsed = parse_message(b"HTTP/1.1 999 \r\n\r\n").unwrap();

    assert_eq!(parsed.status, 999);
    assert_eq!(parsed.reason, "");
}

#[test]
fn test_parse_multiple_headers() {
    let req = b"GET /path HTTP/1.1\r\nHost: example.com\r\nUser-Agent: test-client\r\nAccept: */*\r\n\r\n";
    let parsed = parse_message(req).unwrap();

    assert_eq!(parsed.headers.get("Host"), Some("example.com"));
    assert_eq!(parsed.headers.get("User-Agent"), Some("test-client"));
    assert_eq!(parsed.headers.get("Accept"), Some("*/*"));

    let names: Vec<_> = parsed.headers.iter().map(|(k, _)| k).collect();
    assert_eq!(names, vec!["Host", "User-Agent", "Accept"]);
}

#[test]
fn test_parse_repeated_header_last_wins() {
    let req = b"GET / HTTP/1.1\r\nX-Token: first\r\nX-Token: second\r\n\r\n";
    let parsed = parse_message(req).unwrap();

    assert_eq!(parsed.headers.len(), 1);
    assert_eq!(parsed.headers.get("X-Token"), Some("second"));
}

#[test]
fn test_parse_request_with_path_and_query_string() {
    let req = b"GET /search?q=rust&lang=en HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let parsed = parse_message(req).unwrap();

    assert_eq!(parsed.uri, "/search?q=rust&lang=en");
}

#[test]
fn test_parse_uri_punctuation() {
    let req = b"GET /a;b/c:d@e$f,g-h_i.j!k~l*m'n(o)p+q HTTP/1.1\r\n\r\n";
    let parsed = parse_message(req).unwrap();

    assert_eq!(parsed.uri, "/a;b/c:d@e$f,g-h_i.j!k~l*m'n(o)p+q");
}

#[test]
fn test_parse_any_uppercase_method() {
    let parsed = parse_message(b"PURGE /cache HTTP/1.1\r\n\r\n").unwrap();
    assert_eq!(parsed.method, "PURGE");
}

#[test]
fn test_parse_other_versions() {
    let parsed = parse_message(b"GET / HTTP/2.0\r\n\r\n").unwrap();
    assert_eq!(parsed.version, Version { major: 2, minor: 0 });
}

#[test]
fn test_parse_missing_uri_and_version() {
    let err = parse_message(b"GET\r\n\r\n").unwrap_err();

    assert_eq!(err.position, 0);
    assert!(err.message.contains("request-line or status-line"));
}

#[test]
fn test_parse_lowercase_method() {
    assert!(parse_message(b"get / HTTP/1.1\r\n\r\n").is_err());
}

#[test]
fn test_parse_uri_outside_alphabet() {
    assert!(parse_message(b"GET /a%20b HTTP/1.1\r\n\r\n").is_err());
    assert!(parse_message(b"GET /<script> HTTP/1.1\r\n\r\n").is_err());
}

#[test]
fn test_parse_bad_version() {
    assert!(parse_message(b"GET / HTTP/1\r\n\r\n").is_err());
    assert!(parse_message(b"GET / http/1.1\r\n\r\n").is_err());
}

#[test]
fn test_parse_malformed_header() {
    let err = parse_message(b"GET / HTTP/1.1\r\nBrokenHeader\r\n\r\n").unwrap_err();

    assert_eq!(err.position, 16);
    assert_eq!(err.message, "malformed header line");
}

#[test]
fn test_parse_header_needs_colon_space() {
    assert!(parse_message(b"GET / HTTP/1.1\r\nHost:x\r\n\r\n").is_err());
}

#[test]
fn test_parse_header_name_alphabet() {
    assert!(parse_message(b"GET / HTTP/1.1\r\nX-1: a\r\n\r\n").is_err());
    assert!(parse_message(b"GET / HTTP/1.1\r\nX_Y: a\r\n\r\n").is_err());
}

#[test]
fn test_parse_empty_header_value() {
    assert!(parse_message(b"GET / HTTP/1.1\r\nX-Empty: \r\n\r\n").is_err());
}

#[test]
fn test_parse_missing_blank_line() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n";
    let err = parse_message(req).unwrap_err();

    assert_eq!(err.position, req.len());
    assert_eq!(err.message, "missing terminating blank line");
}

#[test]
fn test_parse_request_with_binary_body() {
    let req = b"POST /upload HTTP/1.1\r\nContent-Length: 4\r\n\r\n\x00\x01\r\n";
    let parsed = parse_message(req).unwrap();

    assert_eq!(parsed.payload, &b"\x00\x01\r\n"[..]);
}

#[test]
fn test_parse_head_stops_at_blank_line() {
    let req = b"POST /api HTTP/1.1\r\nContent-Length: 10\r\n\r\nhello";
    let (head, len) = parse_head(req).unwrap();

    assert_eq!(len, req.len() - 5);
    assert_eq!(head.uri, "/api");
    assert!(head.payload.is_empty());
    assert_eq!(find_head_end(req), Some(len));
}

#[test]
fn test_message_parse_forwards_to_parser() {
    let req = b"DELETE /item/7 HTTP/1.1\r\n\r\n";
    assert_eq!(Message::parse(req).unwrap(), parse_message(req).unwrap());
}
