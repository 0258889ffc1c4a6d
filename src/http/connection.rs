use std::fs::File;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::fs;
use crate::http::buffer::RawBuffer;
use crate::http::log;
use crate::http::parser::parse_request;
use crate::http::request::{Method, RequestHeader};
use crate::http::response::{ResponseHeader, StatusCode};
use crate::http::writer::{ResponseWriter, send_file};

/// Size of a single socket read.
pub const READ_CHUNK_SIZE: usize = 1024;

/// One accepted client socket.
///
/// Serves exactly one request and is then closed.
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    buffer: RawBuffer,
    config: Arc<ServerConfig>,
    state: ConnectionState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Waiting for the rest of the header section.
    Receiving,
    /// `\r\n\r\n` seen; ready to answer.
    Complete,
    /// The client hung up before finishing its header.
    PeerClosed,
    /// Reading from the socket failed.
    Error,
    Closed,
}

/// Outcome of draining the socket.
enum Received {
    Complete,
    PeerClosed,
}

impl Connection {
    pub fn new(stream: TcpStream, peer: SocketAddr, config: Arc<ServerConfig>) -> Self {
        Self {
            stream,
            peer,
            buffer: RawBuffer::new(),
            config,
            state: ConnectionState::Receiving,
        }
    }

    /// Drives the connection to `Closed`. Consumes the connection, so the
    /// socket and buffer are released exactly once.
    pub async fn run(mut self) {
        loop {
            match self.state {
                ConnectionState::Receiving => {
                    self.state = match self.receive().await {
                        Ok(Received::Complete) => ConnectionState::Complete,
                        Ok(Received::PeerClosed) => ConnectionState::PeerClosed,
                        Err(e) => {
                            warn!(peer = %self.peer, error = %e, "failed to read request");
                            ConnectionState::Error
                        }
                    };
                }

                ConnectionState::Complete => {
                    if let Err(e) = self.respond().await {
                        warn!(peer = %self.peer, error = %e, "failed to send response");
                    }
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::PeerClosed => {
                    debug!(
                        peer = %self.peer,
                        received = self.buffer.len(),
                        "peer closed before sending a full header"
                    );
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Error => {
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        self.close().await;
    }

    /// Reads until the header terminator shows up, the peer hangs up, or the
    /// socket fails.
    async fn receive(&mut self) -> io::Result<Received> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];

        loop {
            self.stream.readable().await?;

            // Drain everything that is available right now.
            loop {
                match self.stream.try_read(&mut chunk) {
                    Ok(0) => return Ok(Received::PeerClosed),
                    Ok(n) => {
                        self.buffer.append(&chunk[..n]);
                        if self.buffer.has_header_end() {
                            return Ok(Received::Complete);
                        }
                    }
                    Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            }
        }
    }

    /// Parses the buffered request and sends the response.
    async fn respond(&mut self) -> anyhow::Result<()> {
        let Self {
            stream,
            peer,
            buffer,
            config,
            ..
        } = self;

        let Some(mut request) = parse_request(buffer.as_bytes(), config) else {
            return Ok(());
        };
        log::request_received(&request, *peer);

        let (content_length, file) = open_resource(&mut request);
        let header = ResponseHeader::build(request.status, content_length);

        let mut writer = ResponseWriter::new(&header);
        writer.write_to_stream(stream).await?;

        if let Some(file) = file {
            send_file(stream, &file, content_length).await?;
        }

        log::response_sent(&request, *peer);
        Ok(())
    }

    async fn close(mut self) {
        if let Err(e) = self.stream.shutdown().await {
            debug!(peer = %self.peer, error = %e, "shutdown failed");
        }
        debug!(peer = %self.peer, "connection closed");
    }
}

/// Looks up the requested file and, for GET, opens it.
///
/// Returns the content length to announce and the file to stream. A missing
/// file downgrades the request to 404, an unreadable one to 403.
pub fn open_resource(request: &mut RequestHeader<'_>) -> (u64, Option<File>) {
    if !request.is_ok() {
        return (0, None);
    }

    let Some(content_length) = fs::file_length(&request.filename) else {
        request.reject(StatusCode::NotFound);
        return (0, None);
    };

    if request.method != Method::GET {
        return (content_length, None);
    }

    match fs::open_for_read(&request.filename) {
        Ok(file) => (content_length, Some(file)),
        Err(e) => {
            debug!(filename = %request.filename.display(), error = %e, "cannot open file");
            request.reject(StatusCode::Forbidden);
            (0, None)
        }
    }
}
