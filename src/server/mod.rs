//! Listening socket, connection table and shutdown coordination.

pub mod listener;
pub mod shutdown;

pub use listener::Server;
pub use shutdown::Shutdown;
