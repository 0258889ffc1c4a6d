use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::{TcpListener, TcpSocket, TcpStream, lookup_host};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::http::connection::Connection;
use crate::server::shutdown::Shutdown;

const LISTEN_BACKLOG: u32 = 1024;

/// Pause after a failed accept. Errors such as EMFILE leave the listener
/// readable, so retrying at once would spin.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// The reactor: owns the listening socket and every live connection.
///
/// Runs on a single thread. Connections live in a [`JoinSet`] that only this
/// struct touches; dropping it drops every connection still in flight.
pub struct Server {
    listener: TcpListener,
    config: Arc<ServerConfig>,
    connections: JoinSet<()>,
}

impl Server {
    /// Binds the listening socket. Failure here is fatal to the process.
    pub async fn bind(config: ServerConfig) -> anyhow::Result<Self> {
        let listen_addr = config.listen_addr();
        let addr = lookup_host(&listen_addr)
            .await
            .with_context(|| format!("cannot resolve {}", listen_addr))?
            .next()
            .with_context(|| format!("no address for {}", listen_addr))?;

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()
        } else {
            TcpSocket::new_v6()
        }
        .context("cannot create socket")?;
        socket.set_reuseaddr(true)?;
        socket
            .bind(addr)
            .with_context(|| format!("cannot bind {}", addr))?;
        let listener = socket.listen(LISTEN_BACKLOG).context("listen failed")?;

        info!("Listening on {}", listener.local_addr()?);

        Ok(Self {
            listener,
            config: Arc::new(config),
            connections: JoinSet::new(),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts and serves connections until `shutdown` is triggered.
    ///
    /// In-flight connections are dropped, not drained, when the loop ends.
    pub async fn run(mut self, mut shutdown: Shutdown) -> anyhow::Result<()> {
        loop {
            self.reap_finished();

            tokio::select! {
                biased;

                _ = shutdown.triggered() => {
                    info!("Shutdown signal received");
                    break;
                }

                accepted = self.listener.accept() => match accepted {
                    Ok((socket, peer)) => self.register(socket, peer),
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                },

                Some(finished) = self.connections.join_next() => reaped(finished),
            }
        }

        let Self {
            listener,
            mut connections,
            ..
        } = self;
        drop(listener);
        debug!(open = connections.len(), "dropping open connections");
        connections.shutdown().await;

        Ok(())
    }

    fn register(&mut self, socket: TcpStream, peer: SocketAddr) {
        debug!(%peer, "accepted connection");
        let connection = Connection::new(socket, peer, self.config.clone());
        self.connections.spawn(connection.run());
    }

    /// Drops finished connection tasks without waiting. Keeps the table
    /// small while a busy listener starves the `join_next` branch.
    fn reap_finished(&mut self) {
        while let Some(finished) = self.connections.try_join_next() {
            reaped(finished);
        }
    }
}

fn reaped(finished: Result<(), JoinError>) {
    if let Err(e) = finished {
        if e.is_panic() {
            error!(error = %e, "connection task panicked");
        }
    }
}
