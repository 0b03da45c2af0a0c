//! Wicket - minimal HTTP/1.1 server core
//!
//! Parses one request per connection, hands it to an application handler
//! and writes back its response.

pub mod config;
pub mod http;
pub mod server;
