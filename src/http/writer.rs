use std::fs::File;
use std::io;

use anyhow::{Context, bail};
use tokio::net::TcpStream;

use crate::http::response::ResponseHeader;

/// Sends a serialized header section, resuming after partial writes.
pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(header: &ResponseHeader) -> Self {
        Self {
            buffer: header.serialize(),
            written: 0,
        }
    }

    /// Writes whatever is left of the header.
    ///
    /// A full socket buffer parks the connection until the socket is
    /// writable again; the reactor thread is never blocked.
    pub async fn write_to_stream(&mut self, stream: &TcpStream) -> anyhow::Result<()> {
        while self.written < self.buffer.len() {
            stream.writable().await?;

            match stream.try_write(&self.buffer[self.written..]) {
                Ok(0) => bail!("connection closed while writing"),
                Ok(n) => self.written += n,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => continue,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e).context("failed to send response header"),
            }
        }

        Ok(())
    }
}

/// Upper bound for a single `sendfile` call.
#[cfg(any(target_os = "linux", target_os = "android"))]
const SENDFILE_CHUNK: usize = 1 << 20;

/// Streams the first `content_length` bytes of `file` to the client.
///
/// Bytes go from the page cache to the socket with `sendfile(2)`, without
/// passing through user space.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub async fn send_file(
    stream: &mut TcpStream,
    file: &File,
    content_length: u64,
) -> anyhow::Result<u64> {
    use nix::libc::off_t;
    use nix::sys::sendfile::sendfile;
    use tokio::io::Interest;

    let total = off_t::try_from(content_length).context("file too large to send")?;
    let stream = &*stream;
    let mut offset: off_t = 0;

    while offset < total {
        let count = usize::try_from(total - offset)
            .unwrap_or(SENDFILE_CHUNK)
            .min(SENDFILE_CHUNK);
        let sent = stream
            .async_io(Interest::WRITABLE, || {
                sendfile(stream, file, Some(&mut offset), count).map_err(io::Error::from)
            })
            .await;

        match sent {
            Ok(0) => bail!("file truncated after {} of {} bytes", offset, total),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context("sendfile failed"),
        }
    }

    Ok(content_length)
}

/// Streams the first `content_length` bytes of `file` to the client.
#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub async fn send_file(
    stream: &mut TcpStream,
    file: &File,
    content_length: u64,
) -> anyhow::Result<u64> {
    use tokio::io::AsyncReadExt;

    let file = tokio::fs::File::from_std(file.try_clone()?);
    let mut body = file.take(content_length);
    let sent = tokio::io::copy(&mut body, stream)
        .await
        .context("failed to send file")?;
    if sent < content_length {
        bail!("file truncated after {} of {} bytes", sent, content_length);
    }
    Ok(sent)
}
