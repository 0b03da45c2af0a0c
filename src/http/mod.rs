//! HTTP/1.1 message engine.
//!
//! One request per connection: the head is parsed, the body is framed by
//! `Content-Length`, the handler fills in a response, the response is
//! written and the socket is closed.
//!
//! # Architecture
//!
//! - **`message`**: the request/response entity shared by parser and writer
//! - **`parser`**: grammar for the start line and header block
//! - **`framing`**: how many body bytes still have to be read
//! - **`writer`**: renders a message to bytes, adding `Date` and `Content-Length`
//! - **`status`**: standard reason phrases
//! - **`handler`**: the application callback boundary
//! - **`connection`**: per-connection state machine
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────┐
//!        │ AwaitingHead │ ← Read until "\r\n\r\n"
//!        └──────┬───────┘
//!               │ Head parsed, body incomplete
//!               ▼
//!        ┌──────────────┐
//!        │ ReadingBody  │ ← Read the missing Content-Length bytes
//!        └──────┬───────┘
//!               ▼
//!        ┌──────────────┐
//!        │    Parsed    │ ← Call the handler
//!        └──────┬───────┘
//!               ▼
//!        ┌──────────────┐
//!        │   Handled    │ ← Write the response
//!        └──────┬───────┘
//!               ▼
//!        ┌──────────────┐
//!        │   Written    │ ← Shut the socket down
//!        └──────┬───────┘
//!               ▼
//!            Closed
//! ```
//!
//! A parse failure in `AwaitingHead` or `ReadingBody` moves to `Failed`,
//! which answers `406 Not Acceptable` and then follows `Handled → Written → Closed`.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use wicket::http::connection::Connection;
//! use wicket::http::message::Message;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:1970").await?;
//!     let handler = Arc::new(|_req: &Message, resp: &mut Message| {
//!         resp.status = 200;
//!         resp.payload = "hello\n".into();
//!     });
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let handler = Arc::clone(&handler);
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, handler);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod error;
pub mod framing;
pub mod handler;
pub mod message;
pub mod parser;
pub mod status;
pub mod writer;

pub use error::{ConnectionError, ParseError};
pub use handler::Handler;
pub use message::{Headers, Message, Version};
