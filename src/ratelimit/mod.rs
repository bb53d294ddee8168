//! Fixed-window rate limiting keyed by arbitrary strings.
//!
//! `Limiter` tracks one counting window per key behind a single mutex.
//! Windows are reset lazily: the first `allow` for a key after its window
//! expired installs a fresh window instead of decaying the old count. A
//! background sweep drops windows for keys that went quiet so the map does
//! not grow with every IP or email ever seen.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::{Duration, Instant};
use tokio::time::sleep;

pub mod client_ip;
pub mod login;

#[derive(Debug)]
struct Window {
    count: u32,
    expires_at: Instant,
}

/// "At most `limit` operations per `duration` per key."
///
/// Cloning yields another handle to the same windows. The garbage-collection
/// task exits once every handle is gone.
#[derive(Clone, Debug)]
pub struct Limiter {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    windows: Mutex<HashMap<String, Window>>,
    limit: u32,
    duration: Duration,
}

impl Limiter {
    /// Creates a limiter and spawns its garbage-collection task.
    ///
    /// A zero `duration` produces windows that are expired on arrival, so
    /// every call to `allow` succeeds.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn new(limit: u32, duration: Duration) -> Self {
        let inner = Arc::new(Inner {
            windows: Mutex::new(HashMap::new()),
            limit,
            duration,
        });
        spawn_gc(Arc::downgrade(&inner), gc_interval(duration));
        Self { inner }
    }

    /// Records one operation for `key` and reports whether it fit the budget.
    ///
    /// A missing or expired window is replaced by a fresh one counting this
    /// operation; an exhausted window is left untouched.
    pub fn allow(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut windows = self.inner.lock_windows();
        if let Some(window) = windows.get_mut(key) {
            if now < window.expires_at {
                if window.count >= self.inner.limit {
                    return false;
                }
                window.count += 1;
                return true;
            }
        }
        windows.insert(
            key.to_string(),
            Window {
                count: 1,
                expires_at: window_expiry(now, self.inner.duration),
            },
        );
        true
    }

    /// Remaining budget for `key`, without consuming any of it.
    #[must_use]
    pub fn remaining(&self, key: &str) -> u32 {
        let now = Instant::now();
        let windows = self.inner.lock_windows();
        match windows.get(key) {
            Some(window) if now < window.expires_at => {
                self.inner.limit.saturating_sub(window.count)
            }
            _ => self.inner.limit,
        }
    }

    /// Forgets `key` entirely, restoring its full budget.
    pub fn reset(&self, key: &str) {
        self.inner.lock_windows().remove(key);
    }
}

impl Inner {
    fn lock_windows(&self) -> MutexGuard<'_, HashMap<String, Window>> {
        // A poisoned lock only means a holder panicked mid-update; the window
        // table itself is still valid.
        self.windows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove_expired(&self) {
        let now = Instant::now();
        self.lock_windows()
            .retain(|_, window| now < window.expires_at);
    }
}

// `Instant` has no saturating add; a duration too large to represent becomes
// a window that never expires within the process lifetime.
fn window_expiry(now: Instant, duration: Duration) -> Instant {
    now.checked_add(duration)
        .unwrap_or_else(|| now + Duration::from_secs(60 * 60 * 24 * 365 * 30))
}

// Sweep at twice the window length, floored at one second so a zero-duration
// limiter cannot spin the sweeper.
fn gc_interval(duration: Duration) -> Duration {
    duration.saturating_mul(2).max(Duration::from_secs(1))
}

fn spawn_gc(inner: Weak<Inner>, every: Duration) {
    tokio::spawn(async move {
        loop {
            sleep(every).await;
            let Some(inner) = inner.upgrade() else {
                break;
            };
            inner.remove_expired();
        }
    });
}
