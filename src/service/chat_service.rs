//! Chat service: validates inbound events, persists, and emits outbound
//! events.
//!
//! Orchestration layer between the WebSocket connection loop and the
//! store. Every handler follows the pattern: validate input → call the
//! store → emit events through the [`SessionRegistry`] → return. Handlers
//! are stateless with respect to each other and never retry.

use std::sync::Arc;

use crate::domain::event::{
    FetchMessagesPayload, LoginPayload, MessageRecord, SendMessagePayload, ServerEvent,
};
use crate::domain::{SessionId, SessionRegistry, wallet};
use crate::error::GatewayError;
use crate::persistence::MessageStore;

/// Maximum message length in characters, checked against the raw
/// (untrimmed) content.
pub const MAX_MESSAGE_CHARS: usize = 1000;

/// Number of messages returned by `fetch_messages` when no limit is given.
pub const DEFAULT_FETCH_LIMIT: i64 = 50;

/// Hard cap on `fetch_messages`; larger requests are silently clamped,
/// not rejected.
pub const MAX_FETCH_LIMIT: i64 = 100;

/// Event handlers for the chat relay.
///
/// Owns the store (any [`MessageStore`] implementation) and a shared
/// reference to the session registry. One instance serves all connections.
#[derive(Debug, Clone)]
pub struct ChatService<S> {
    store: S,
    registry: Arc<SessionRegistry>,
}

impl<S: MessageStore> ChatService<S> {
    /// Creates a new `ChatService`.
    #[must_use]
    pub fn new(store: S, registry: Arc<SessionRegistry>) -> Self {
        Self { store, registry }
    }

    /// Returns the shared session registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// `login`: validate the wallet, idempotently create the user row,
    /// bind the wallet to the session, and confirm to the caller.
    ///
    /// # Errors
    ///
    /// [`GatewayError::InvalidWallet`] on a malformed or missing wallet;
    /// [`GatewayError::Store`] if the user upsert fails.
    pub async fn login(
        &self,
        session_id: SessionId,
        payload: LoginPayload,
    ) -> Result<(), GatewayError> {
        let wallet = validate_wallet(payload.wallet.as_deref())?;

        self.store.ensure_user(wallet).await?;
        self.registry.bind_wallet(session_id, wallet).await;

        tracing::info!(%session_id, wallet, "login success");
        self.registry
            .send_to(
                session_id,
                ServerEvent::LoginSuccess {
                    wallet: wallet.to_string(),
                },
            )
            .await;
        Ok(())
    }

    /// `send_message`: validate wallet and content, persist the message,
    /// then broadcast it to every other session and echo it to the caller
    /// through the same channel.
    ///
    /// The two emissions (all-except-sender, then sender) are deliberate
    /// and preserved as separate registry calls.
    ///
    /// # Errors
    ///
    /// Validation errors for a bad wallet or bad content;
    /// [`GatewayError::Store`] if the insert fails.
    pub async fn send_message(
        &self,
        session_id: SessionId,
        payload: SendMessagePayload,
    ) -> Result<(), GatewayError> {
        let wallet = validate_wallet(payload.wallet.as_deref())?;
        let content = validate_content(payload.content.as_deref())?;

        let (id, created_at) = self.store.insert_message(wallet, content).await?;

        let record = MessageRecord {
            id,
            sender: wallet.to_string(),
            content: content.to_string(),
            created_at,
        };

        tracing::info!(%session_id, wallet, message_id = id, "message posted");

        let event = ServerEvent::NewMessage(record);
        self.registry.broadcast_except(session_id, &event).await;
        self.registry.send_to(session_id, event).await;
        Ok(())
    }

    /// `fetch_messages`: return up to `limit` recent messages to the
    /// caller, newest first, preserving store order.
    ///
    /// The limit defaults to [`DEFAULT_FETCH_LIMIT`] and is clamped into
    /// `[0, MAX_FETCH_LIMIT]`; a limit of `0` yields an empty list, not an
    /// error.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Store`] if the history query fails.
    pub async fn fetch_messages(
        &self,
        session_id: SessionId,
        payload: FetchMessagesPayload,
    ) -> Result<(), GatewayError> {
        let limit = clamp_limit(payload.limit);
        let rows = self.store.fetch_recent(limit).await?;
        let records: Vec<MessageRecord> = rows.into_iter().map(MessageRecord::from).collect();

        tracing::debug!(%session_id, limit, returned = records.len(), "history fetched");
        self.registry
            .send_to(session_id, ServerEvent::Messages(records))
            .await;
        Ok(())
    }
}

/// Validates a wallet address, treating an absent value as invalid.
fn validate_wallet(wallet: Option<&str>) -> Result<&str, GatewayError> {
    match wallet {
        Some(w) if wallet::is_valid(w) => Ok(w),
        _ => Err(GatewayError::InvalidWallet),
    }
}

/// Validates message content: present and non-empty after trimming, at
/// most [`MAX_MESSAGE_CHARS`] characters before trimming. The original
/// (untrimmed) content is what gets stored and broadcast.
fn validate_content(content: Option<&str>) -> Result<&str, GatewayError> {
    let Some(content) = content else {
        return Err(GatewayError::EmptyMessage);
    };
    if content.trim().is_empty() {
        return Err(GatewayError::EmptyMessage);
    }
    if content.chars().count() > MAX_MESSAGE_CHARS {
        return Err(GatewayError::MessageTooLong);
    }
    Ok(content)
}

/// Resolves the effective fetch limit: default when absent, clamped into
/// `[0, MAX_FETCH_LIMIT]` otherwise.
fn clamp_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_FETCH_LIMIT)
        .clamp(0, MAX_FETCH_LIMIT)
}
