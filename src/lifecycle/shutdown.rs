//! Shutdown coordination for the relay.

use tokio_util::sync::CancellationToken;

/// Coordinator for graceful shutdown.
///
/// Every long-running task holds a clone of the token; in-flight batches see
/// a triggered shutdown as cancellation.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    token: CancellationToken,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Token observed by subsystems.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        self.token.cancel();
    }

    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait until shutdown is triggered.
    pub async fn wait(&self) {
        self.token.cancelled().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_child_tokens() {
        let shutdown = Shutdown::new();
        let request = shutdown.token().child_token();
        assert!(!request.is_cancelled());

        shutdown.trigger();
        shutdown.wait().await;
        assert!(shutdown.is_triggered());
        assert!(request.is_cancelled());
    }
}
