//! HTTP protocol implementation.
//!
//! This module implements a minimal HTTP/1.1 static file server. One request
//! is served per connection; the connection is always closed afterwards.
//!
//! # Architecture
//!
//! - **`buffer`**: Receive buffer that tracks the end of the header section
//! - **`parser`**: Byte-level request parser with strict grammar checks
//! - **`request`**: Parsed request header representation
//! - **`response`**: Status codes and response header generation
//! - **`writer`**: Sends the header and streams the file body
//! - **`connection`**: The per-connection state machine
//! - **`log`**: Access log events
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │  Receiving  │ ← Drain socket until \r\n\r\n
//!        └──────┬──────┘
//!               │
//!      ┌────────┼──────────────┐
//!      ▼        ▼              ▼
//! ┌─────────┐ ┌────────────┐ ┌───────┐
//! │Complete │ │ PeerClosed │ │ Error │
//! └────┬────┘ └─────┬──────┘ └───┬───┘
//!      │ respond    │            │
//!      ▼            ▼            ▼
//!        ┌──────────────────┐
//!        │      Closed      │ ← Socket shut down and dropped
//!        └──────────────────┘
//! ```
//!
//! # Path traversal
//!
//! The request target is appended to the document root verbatim. A target
//! containing `..` segments can reach files outside the root. Do not expose
//! this server where that matters without adding a check.

pub mod buffer;
pub mod connection;
pub mod log;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
