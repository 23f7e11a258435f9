//! WebSocket connection state machine.
//!
//! One task per connection: register the session, then loop between
//! inbound frames and the session's outbound event channel. Inbound
//! events are processed one at a time for this connection (store calls
//! are awaited inline), while other sessions' events interleave freely
//! on their own tasks. The loop is also the failure boundary: a handler
//! error becomes a single `error` event to this session, never a closed
//! connection or a crashed process.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use crate::domain::SessionId;
use crate::domain::event::{ClientCommand, ClientEnvelope, ServerEvent};
use crate::persistence::MessageStore;
use crate::service::ChatService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// Registers a fresh [`SessionId`] on entry (the `Connected` state) and
/// deregisters it on every exit path (`Disconnected`).
pub async fn run_connection<S: MessageStore>(socket: WebSocket, service: Arc<ChatService<S>>) {
    let session_id = SessionId::new();
    let registry = Arc::clone(service.registry());
    let mut event_rx = registry.register(session_id).await;

    tracing::info!(%session_id, "session connected");

    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // Incoming frame from the client
            frame = ws_rx.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        dispatch_frame(&service, session_id, text.as_str()).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::warn!(%session_id, error = %e, "ws read error");
                        break;
                    }
                    // Ping/Pong are handled by the transport; binary ignored
                    _ => {}
                }
            }
            // Outbound event queued for this session
            event = event_rx.recv() => {
                let Some(event) = event else { break };
                match serde_json::to_string(&event) {
                    Ok(json) => {
                        if ws_tx.send(Message::text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!(%session_id, error = %e, "event serialization failed");
                    }
                }
            }
        }
    }

    let wallet = registry.wallet_of(session_id).await;
    registry.deregister(session_id).await;
    tracing::info!(
        %session_id,
        wallet = wallet.as_deref().unwrap_or("-"),
        "session disconnected"
    );
}

/// Decodes one inbound text frame and dispatches it to the matching
/// handler, converting any failure into an `error` event for the caller.
async fn dispatch_frame<S: MessageStore>(
    service: &ChatService<S>,
    session_id: SessionId,
    text: &str,
) {
    let command = serde_json::from_str::<ClientEnvelope>(text)
        .map_err(|e| e.to_string())
        .and_then(ClientCommand::from_envelope);

    let result = match command {
        Ok(ClientCommand::Login(payload)) => service.login(session_id, payload).await,
        Ok(ClientCommand::SendMessage(payload)) => service.send_message(session_id, payload).await,
        Ok(ClientCommand::FetchMessages(payload)) => {
            service.fetch_messages(session_id, payload).await
        }
        Err(reason) => {
            tracing::warn!(
                %session_id,
                reason = %reason,
                raw = text.get(..text.len().min(200)).unwrap_or(text),
                "unrecognized event"
            );
            service
                .registry()
                .send_to(
                    session_id,
                    ServerEvent::Error {
                        message: "Invalid event payload".to_string(),
                    },
                )
                .await;
            return;
        }
    };

    if let Err(err) = result {
        if err.is_validation() {
            tracing::info!(%session_id, error = %err, "request rejected");
        } else {
            tracing::error!(%session_id, error = %err, "handler failed");
        }
        service
            .registry()
            .send_to(session_id, ServerEvent::from_error(&err))
            .await;
    }
}
