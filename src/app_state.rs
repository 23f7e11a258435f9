//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::persistence::PostgresStore;
use crate::service::ChatService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Chat service handling every inbound event; also owns the session
    /// registry used by the WebSocket layer.
    pub chat_service: Arc<ChatService<PostgresStore>>,
}
