//! Shutdown coordination for the supervisor.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Coordinator for graceful shutdown.
///
/// Wraps a cancellation token that every long-running wait races
/// against. Unlike a channel, an already-triggered shutdown stays
/// observable for any number of late waiters.
#[derive(Clone, Default)]
pub struct Shutdown {
    token: CancellationToken,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        self.token.cancel();
    }

    /// Whether shutdown has been triggered.
    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolve once shutdown is triggered. Resolves immediately if it
    /// already was.
    pub async fn triggered(&self) {
        self.token.cancelled().await;
    }

    /// Sleep for `duration` unless shutdown fires first.
    /// Returns true when the full duration elapsed.
    pub async fn sleep_cancellable(&self, duration: Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(duration) => true,
            _ = self.triggered() => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_sleep_interrupted_by_trigger() {
        let shutdown = Shutdown::new();
        let waiter = shutdown.clone();
        let handle =
            tokio::spawn(async move { waiter.sleep_cancellable(Duration::from_secs(60)).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.trigger();

        let start = Instant::now();
        assert!(!handle.await.unwrap());
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_sleep_completes_without_trigger() {
        let shutdown = Shutdown::new();
        assert!(shutdown.sleep_cancellable(Duration::from_millis(10)).await);
    }

    #[tokio::test]
    async fn test_trigger_observable_after_the_fact() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        assert!(shutdown.is_triggered());
        // a waiter arriving late still sees it
        shutdown.triggered().await;
        assert!(!shutdown.sleep_cancellable(Duration::from_secs(60)).await);
    }
}
