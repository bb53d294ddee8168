//! Session lifecycle: the persistence contract and the background worker
//! that closes sessions abandoned by inactive users.

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

pub mod cleanup;
pub mod postgres;

/// Narrow persistence contract consumed by the cleanup worker.
///
/// Call `ensure_indexes` once at startup, before spawning the worker; the
/// worker itself only ever calls `close_inactive_sessions`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Idempotent schema and index preparation.
    ///
    /// # Errors
    /// Returns an error if the backing store rejects the preparation.
    async fn ensure_indexes(&self) -> Result<()>;

    /// Closes every session whose last activity predates
    /// `now - inactive_threshold` and returns how many were closed.
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be reached or the update
    /// fails.
    async fn close_inactive_sessions(&self, inactive_threshold: Duration) -> Result<u64>;
}
