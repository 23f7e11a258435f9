//! Live-connection registry with per-session outbound channels.
//!
//! [`SessionRegistry`] is the single owner of live-connection state: every
//! WebSocket connection registers on connect and deregisters on disconnect.
//! Each entry holds an unbounded [`mpsc`] sender; the connection's write
//! loop drains the matching receiver, so emission order to a given session
//! is exactly the order the server produced events.

use std::collections::HashMap;

use tokio::sync::{RwLock, mpsc};

use super::SessionId;
use super::event::ServerEvent;

/// Per-session connection state held by the registry.
#[derive(Debug)]
struct SessionHandle {
    /// Outbound event channel; the connection's write loop owns the receiver.
    tx: mpsc::UnboundedSender<ServerEvent>,
    /// Wallet bound by a successful `login`. Never a precondition for
    /// sending or fetching — any connection may do both.
    wallet: Option<String>,
}

/// Central store for all live sessions.
///
/// Mutated only on connect, disconnect, and login; read by the broadcast
/// path. A single `RwLock` over the map is sufficient — contention is low
/// and every operation is brief.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new session, returning the receiver end of its outbound
    /// event channel. Always succeeds; every connection is accepted.
    pub async fn register(&self, session_id: SessionId) -> mpsc::UnboundedReceiver<ServerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.sessions
            .write()
            .await
            .insert(session_id, SessionHandle { tx, wallet: None });
        rx
    }

    /// Removes a session. A no-op if the session was already removed.
    pub async fn deregister(&self, session_id: SessionId) {
        self.sessions.write().await.remove(&session_id);
    }

    /// Binds a wallet to a session after a successful login.
    pub async fn bind_wallet(&self, session_id: SessionId, wallet: &str) {
        if let Some(handle) = self.sessions.write().await.get_mut(&session_id) {
            handle.wallet = Some(wallet.to_string());
        }
    }

    /// Returns the wallet bound to a session, if any.
    pub async fn wallet_of(&self, session_id: SessionId) -> Option<String> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .and_then(|h| h.wallet.clone())
    }

    /// Sends an event to a single session.
    ///
    /// Returns `false` if the session is gone (disconnected between the
    /// handler starting and the emission) — the event is dropped, which is
    /// the correct outcome for an ephemeral recipient.
    pub async fn send_to(&self, session_id: SessionId, event: ServerEvent) -> bool {
        let sessions = self.sessions.read().await;
        match sessions.get(&session_id) {
            Some(handle) => handle.tx.send(event).is_ok(),
            None => false,
        }
    }

    /// Sends an event to every session except `origin`.
    ///
    /// Returns the number of sessions the event was queued for.
    pub async fn broadcast_except(&self, origin: SessionId, event: &ServerEvent) -> usize {
        let sessions = self.sessions.read().await;
        let mut delivered = 0;
        for (&id, handle) in sessions.iter() {
            if id == origin {
                continue;
            }
            if handle.tx.send(event.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Returns the number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns `true` if no sessions are connected.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn error_event(message: &str) -> ServerEvent {
        ServerEvent::Error {
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn register_and_send_to() {
        let registry = SessionRegistry::new();
        let id = SessionId::new();
        let mut rx = registry.register(id).await;

        assert!(registry.send_to(id, error_event("hi")).await);
        let Some(ServerEvent::Error { message }) = rx.recv().await else {
            panic!("expected error event");
        };
        assert_eq!(message, "hi");
    }

    #[test]
    fn send_to_unknown_session_is_dropped() {
        tokio_test::block_on(async {
            let registry = SessionRegistry::new();
            assert!(!registry.send_to(SessionId::new(), error_event("x")).await);
        });
    }

    #[tokio::test]
    async fn broadcast_except_skips_origin() {
        let registry = SessionRegistry::new();
        let origin = SessionId::new();
        let other_a = SessionId::new();
        let other_b = SessionId::new();

        let mut origin_rx = registry.register(origin).await;
        let mut rx_a = registry.register(other_a).await;
        let mut rx_b = registry.register(other_b).await;

        let delivered = registry.broadcast_except(origin, &error_event("all")).await;
        assert_eq!(delivered, 2);

        assert!(rx_a.recv().await.is_some());
        assert!(rx_b.recv().await.is_some());
        assert!(origin_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn deregister_removes_session() {
        let registry = SessionRegistry::new();
        let id = SessionId::new();
        let _rx = registry.register(id).await;
        assert_eq!(registry.len().await, 1);

        registry.deregister(id).await;
        assert!(registry.is_empty().await);
        assert!(!registry.send_to(id, error_event("gone")).await);
    }

    #[tokio::test]
    async fn bind_wallet_sets_and_reads_back() {
        let registry = SessionRegistry::new();
        let id = SessionId::new();
        let _rx = registry.register(id).await;

        assert!(registry.wallet_of(id).await.is_none());
        registry
            .bind_wallet(id, "11111111111111111111111111111111")
            .await;
        assert_eq!(
            registry.wallet_of(id).await.as_deref(),
            Some("11111111111111111111111111111111")
        );
    }

    #[tokio::test]
    async fn events_arrive_in_emission_order() {
        let registry = SessionRegistry::new();
        let id = SessionId::new();
        let mut rx = registry.register(id).await;

        for i in 0..5 {
            registry.send_to(id, error_event(&i.to_string())).await;
        }
        for i in 0..5 {
            let Some(ServerEvent::Error { message }) = rx.recv().await else {
                panic!("expected event {i}");
            };
            assert_eq!(message, i.to_string());
        }
    }
}
