//! Cooperative shutdown.
//!
//! SIGINT and SIGTERM are turned into a flag by a task that waits on the
//! signal streams; nothing runs inside a signal handler. The reactor checks
//! the flag once per loop iteration.

use std::io;
use std::sync::Arc;

use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::watch;
use tracing::info;

/// Cancellation token shared between the signal task and the reactor.
#[derive(Debug, Clone)]
pub struct Shutdown {
    sender: Arc<watch::Sender<bool>>,
    receiver: watch::Receiver<bool>,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once [`Shutdown::trigger`] has been called.
    pub async fn triggered(&mut self) {
        while !*self.receiver.borrow_and_update() {
            // The sender lives as long as `self`, so this cannot fail.
            if self.receiver.changed().await.is_err() {
                return;
            }
        }
    }

    /// Spawns a task that trips the token on SIGINT or SIGTERM.
    ///
    /// Must be called from within the runtime.
    pub fn listen_for_signals(&self) -> io::Result<()> {
        let mut interrupt = signal(SignalKind::interrupt())?;
        let mut terminate = signal(SignalKind::terminate())?;
        let shutdown = self.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = interrupt.recv() => info!("Received SIGINT, shutting down"),
                _ = terminate.recv() => info!("Received SIGTERM, shutting down"),
            }
            shutdown.trigger();
        });

        Ok(())
    }
}
