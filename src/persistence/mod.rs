//! Persistence layer: PostgreSQL store for users and messages.
//!
//! The store is a passive record keeper behind the event handlers. Its
//! contract is the [`MessageStore`] trait: idempotent user upsert, message
//! insert returning the store-assigned id and timestamp, and a
//! newest-first history fetch. The concrete implementation uses
//! `sqlx::PgPool` for async PostgreSQL access; service tests substitute an
//! in-memory store.

pub mod models;
pub mod postgres;

pub use postgres::PostgresStore;

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::error::GatewayError;
use models::MessageRow;

/// Contract for the persistence gateway.
///
/// Every operation acquires its own connection for its own duration and
/// commits its writes before returning success.
pub trait MessageStore: Send + Sync {
    /// Idempotently inserts a user row. A no-op if the wallet exists.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on store failure.
    fn ensure_user(&self, wallet: &str) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Inserts a message, auto-creating the sender's user row, and returns
    /// the store-assigned id and timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on connectivity or constraint
    /// failure, including a failed commit.
    fn insert_message(
        &self,
        wallet: &str,
        content: &str,
    ) -> impl Future<Output = Result<(i64, DateTime<Utc>), GatewayError>> + Send;

    /// Returns up to `limit` most recent messages, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] on store failure.
    fn fetch_recent(
        &self,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<MessageRow>, GatewayError>> + Send;
}
