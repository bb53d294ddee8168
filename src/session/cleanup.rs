//! Background worker that closes inactive sessions on a fixed cadence.
//!
//! Each tick asks the store to close sessions idle longer than the configured
//! threshold. Store failures are logged and retried on the next tick; the
//! loop only ends when the worker is stopped or dropped.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{error, info};

use super::SessionStore;

const STORE_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Poll cadence and inactivity cutoff for the worker.
#[derive(Clone, Copy, Debug)]
pub struct SessionCleanupConfig {
    interval: Duration,
    inactive_threshold: Duration,
}

impl SessionCleanupConfig {
    /// Default worker config: poll every 60 seconds, close sessions idle for
    /// 10 minutes or more.
    #[must_use]
    pub fn new() -> Self {
        Self {
            interval: Duration::from_secs(60),
            inactive_threshold: Duration::from_secs(600),
        }
    }

    #[must_use]
    pub fn with_interval_seconds(mut self, seconds: u64) -> Self {
        self.interval = Duration::from_secs(seconds);
        self
    }

    #[must_use]
    pub fn with_inactive_threshold_seconds(mut self, seconds: u64) -> Self {
        self.inactive_threshold = Duration::from_secs(seconds);
        self
    }

    #[must_use]
    pub fn normalize(self) -> Self {
        let interval = if self.interval.is_zero() {
            Duration::from_secs(1)
        } else {
            self.interval
        };
        let inactive_threshold = if self.inactive_threshold.is_zero() {
            Duration::from_secs(1)
        } else {
            self.inactive_threshold
        };
        Self {
            interval,
            inactive_threshold,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn inactive_threshold(&self) -> Duration {
        self.inactive_threshold
    }
}

impl Default for SessionCleanupConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to the spawned cleanup loop.
///
/// Construction spawns the loop (there is no separate start), and `stop`
/// consumes the handle, so a second competing loop or a double stop does not
/// compile. Dropping the handle without calling `stop` also ends the loop,
/// just without waiting for it.
pub struct SessionCleanup {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl SessionCleanup {
    /// Spawns the cleanup loop.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn spawn(store: Arc<dyn SessionStore>, config: SessionCleanupConfig) -> Self {
        let config = config.normalize();
        let interval = config.interval();
        let inactive_threshold = config.inactive_threshold();
        let (stop, mut stopped) = oneshot::channel();

        info!(
            interval_secs = interval.as_secs(),
            inactive_threshold_secs = inactive_threshold.as_secs(),
            "session cleanup worker started"
        );
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    () = sleep(interval) => {
                        close_inactive(store.as_ref(), inactive_threshold).await;
                    }
                }
            }
        });

        Self { stop, handle }
    }

    /// Signals the loop and waits for it to terminate.
    ///
    /// A store call already in flight is not interrupted; it stays bounded by
    /// the 30-second store timeout.
    pub async fn stop(self) {
        let _ = self.stop.send(());
        if let Err(err) = self.handle.await {
            error!("session cleanup worker task failed: {err}");
        }
        info!("session cleanup worker stopped");
    }
}

async fn close_inactive(store: &dyn SessionStore, inactive_threshold: Duration) {
    match timeout(
        STORE_CALL_TIMEOUT,
        store.close_inactive_sessions(inactive_threshold),
    )
    .await
    {
        Ok(Ok(0)) => {}
        Ok(Ok(count)) => info!(count, "closed inactive sessions"),
        Ok(Err(err)) => error!("failed to close inactive sessions: {err}"),
        Err(_) => error!(
            "failed to close inactive sessions: store call exceeded {}s",
            STORE_CALL_TIMEOUT.as_secs()
        ),
    }
}
