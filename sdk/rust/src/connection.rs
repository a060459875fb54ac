//! Connection state machine.
//!
//! ```text
//! Disconnected ──▶ Connecting ──probe ok──▶ Connected
//!      ▲               │
//!      └─probe failed, wait fixed delay─┘
//! ```
//!
//! Attempts repeat without limit until one succeeds or the caller cancels.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Checks that the relay is reachable.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self) -> ClientResult<()>;
}

pub struct Connection<P> {
    probe: P,
    retry_delay: Duration,
    state: watch::Sender<ConnectionState>,
    attempts: AtomicU64,
}

impl<P: Probe> Connection<P> {
    pub fn new(probe: P, retry_delay: Duration) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            probe,
            retry_delay,
            state,
            attempts: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Probe attempts made so far.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Drop back to `Disconnected` after a transport failure.
    pub fn mark_disconnected(&self) {
        self.state.send_replace(ConnectionState::Disconnected);
    }

    /// Drive the machine until `Connected`.
    ///
    /// Returns immediately when already connected. Only cancellation stops
    /// the retries.
    pub async fn establish(&self, cancel: &CancellationToken) -> ClientResult<()> {
        loop {
            if self.state() == ConnectionState::Connected {
                return Ok(());
            }

            self.state.send_replace(ConnectionState::Connecting);
            let attempt = self.attempts.fetch_add(1, Ordering::Relaxed) + 1;

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    self.mark_disconnected();
                    return Err(ClientError::Cancelled);
                }
                result = self.probe.probe() => result,
            };

            match result {
                Ok(()) => {
                    self.state.send_replace(ConnectionState::Connected);
                    tracing::info!(attempt, "Connected to relay");
                    return Ok(());
                }
                Err(e) => {
                    self.mark_disconnected();
                    tracing::warn!(
                        attempt,
                        error = %e,
                        retry_in_ms = self.retry_delay.as_millis() as u64,
                        "Relay unreachable, retrying"
                    );
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(ClientError::Cancelled),
                _ = tokio::time::sleep(self.retry_delay) => {}
            }
        }
    }
}
