//! PostgreSQL-backed session store.
//!
//! `close_inactive_sessions` flips `logout_at` and `end_reason` only;
//! `duration_secs` is left NULL for inactivity closures, interactive logout
//! owns that column.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use std::time::Duration;
use tracing::Instrument;

use super::SessionStore;

const SCHEMA: [&str; 4] = [
    "CREATE TABLE IF NOT EXISTS sessions (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id UUID NOT NULL,
        organization_id UUID,
        login_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        last_active_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        logout_at TIMESTAMPTZ,
        end_reason TEXT,
        current_page TEXT,
        created_by TEXT,
        ip TEXT,
        user_agent TEXT,
        duration_secs BIGINT
    )",
    "CREATE INDEX IF NOT EXISTS idx_sessions_user_logout ON sessions (user_id, logout_at)",
    "CREATE INDEX IF NOT EXISTS idx_sessions_last_active_logout \
     ON sessions (last_active_at, logout_at)",
    "CREATE INDEX IF NOT EXISTS idx_sessions_org_login \
     ON sessions (organization_id, login_at DESC)",
];

/// Session persistence over a shared `PgPool`.
#[derive(Debug)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn ensure_indexes(&self) -> Result<()> {
        for statement in SCHEMA {
            let span = tracing::info_span!(
                "db.query",
                db.system = "postgresql",
                db.operation = "CREATE"
            );
            sqlx::query(statement)
                .execute(&self.pool)
                .instrument(span)
                .await
                .context("failed to prepare session schema")?;
        }
        Ok(())
    }

    async fn close_inactive_sessions(&self, inactive_threshold: Duration) -> Result<u64> {
        let query = "UPDATE sessions SET logout_at = NOW(), end_reason = 'inactive' \
                     WHERE logout_at IS NULL AND last_active_at < NOW() - $1::interval";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE"
        );
        let result = sqlx::query(query)
            .bind(format!("{} seconds", inactive_threshold.as_secs()))
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to close inactive sessions")?;
        Ok(result.rows_affected())
    }
}
