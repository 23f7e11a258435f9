//! PostgreSQL implementation of the persistence gateway.
//!
//! Every operation checks a connection out of the [`PgPool`] for its own
//! duration and releases it on every exit path (sqlx handles the scoped
//! acquisition), so no connection is ever held across an await point that
//! belongs to another operation. Writes commit before the method returns;
//! a commit failure surfaces as [`GatewayError::Store`] and leaves no
//! partial visible state.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::MessageStore;
use super::models::MessageRow;
use crate::config::GatewayConfig;
use crate::error::GatewayError;

/// PostgreSQL-backed store for users and messages.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connects to the database described by the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] if the pool cannot be established.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(std::time::Duration::from_secs(
                config.database_connect_timeout_secs,
            ))
            .connect(&config.database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Wraps an existing pool. Used by callers that manage the pool
    /// lifecycle themselves.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `users` and `messages` tables if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on database failure.
    pub async fn ensure_schema(&self) -> Result<(), GatewayError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                wallet TEXT PRIMARY KEY
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS messages (
                id            BIGSERIAL PRIMARY KEY,
                sender_wallet TEXT NOT NULL REFERENCES users(wallet),
                content       TEXT NOT NULL,
                created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_messages_created_at ON messages(created_at)")
            .execute(&self.pool)
            .await?;

        tracing::info!("database schema ready");
        Ok(())
    }
}

impl MessageStore for PostgresStore {
    async fn ensure_user(&self, wallet: &str) -> Result<(), GatewayError> {
        sqlx::query("INSERT INTO users (wallet) VALUES ($1) ON CONFLICT (wallet) DO NOTHING")
            .bind(wallet)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // Both statements run in one transaction so a failure leaves no
    // partial state. The returned `created_at` is authoritative: the
    // broadcast payload carries it so history fetches match exactly.
    async fn insert_message(
        &self,
        wallet: &str,
        content: &str,
    ) -> Result<(i64, DateTime<Utc>), GatewayError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO users (wallet) VALUES ($1) ON CONFLICT (wallet) DO NOTHING")
            .bind(wallet)
            .execute(&mut *tx)
            .await?;

        let (id, created_at) = sqlx::query_as::<_, (i64, DateTime<Utc>)>(
            "INSERT INTO messages (sender_wallet, content) VALUES ($1, $2) \
             RETURNING id, created_at",
        )
        .bind(wallet)
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((id, created_at))
    }

    async fn fetch_recent(&self, limit: i64) -> Result<Vec<MessageRow>, GatewayError> {
        let rows = sqlx::query_as::<_, (i64, String, String, DateTime<Utc>)>(
            "SELECT id, sender_wallet, content, created_at FROM messages \
             ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, sender_wallet, content, created_at)| MessageRow {
                id,
                sender_wallet,
                content,
                created_at,
            })
            .collect())
    }
}
