//! httpd - minimal static file HTTP/1.1 server
//!
//! Core library: request parsing, response generation and the
//! single-threaded connection reactor.

pub mod cli;
pub mod config;
pub mod daemon;
pub mod fs;
pub mod http;
pub mod server;
