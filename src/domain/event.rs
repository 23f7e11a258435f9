//! Wire event types: inbound envelope, commands, and outbound events.
//!
//! The protocol is event-name + payload over a persistent WebSocket.
//! Inbound frames arrive as `{"event": "...", "data": {...}}` where the
//! payload may be absent entirely; outbound events use the same envelope.
//! Payload fields are `Option` so that a missing field surfaces as the
//! specific validation error from the handler, never as a parse failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level inbound message envelope.
///
/// Parsed first so that the payload can be decoded per event name, and so
/// that events with no payload at all (`fetch_messages`) remain valid.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientEnvelope {
    /// Event name discriminator (`login`, `send_message`, `fetch_messages`).
    pub event: String,
    /// Event-specific payload; `null` when the client sent none.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// `login` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginPayload {
    /// Wallet address to register; validated by the handler.
    pub wallet: Option<String>,
}

/// `send_message` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendMessagePayload {
    /// Sender wallet address; validated by the handler.
    pub wallet: Option<String>,
    /// Message text; validated non-empty and length-capped by the handler.
    pub content: Option<String>,
}

/// `fetch_messages` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetchMessagesPayload {
    /// Maximum number of messages to return; defaulted and clamped by the
    /// handler. Coerced to an integer on decode: floats truncate and
    /// numeric strings parse, tolerating loose client encodings.
    #[serde(default, deserialize_with = "lenient_limit")]
    pub limit: Option<i64>,
}

/// Deserializes `limit` with integer coercion: integers pass through,
/// floats truncate toward zero, numeric strings parse. Anything else is a
/// payload error.
fn lenient_limit<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error as _;

    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => coerce_to_i64(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("limit must be numeric, got {value}"))),
    }
}

/// Integer coercion for JSON values; `None` when the value is not numeric.
fn coerce_to_i64(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => {
            n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64))
        }
        serde_json::Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}

/// A fully decoded inbound command.
#[derive(Debug, Clone)]
pub enum ClientCommand {
    /// Register the wallet identity for this session.
    Login(LoginPayload),
    /// Post a message to the room.
    SendMessage(SendMessagePayload),
    /// Request recent message history.
    FetchMessages(FetchMessagesPayload),
}

impl ClientCommand {
    /// Decodes an envelope into a typed command.
    ///
    /// A `null` payload decodes to the payload type's default (all fields
    /// absent), matching clients that omit `data` entirely.
    ///
    /// # Errors
    ///
    /// Returns the raw event name if it is not one of the three supported
    /// events, or a `serde_json` message if the payload has the wrong shape.
    pub fn from_envelope(envelope: ClientEnvelope) -> Result<Self, String> {
        fn payload<T: Default + for<'de> Deserialize<'de>>(
            data: serde_json::Value,
        ) -> Result<T, String> {
            if data.is_null() {
                Ok(T::default())
            } else {
                serde_json::from_value(data).map_err(|e| e.to_string())
            }
        }

        match envelope.event.as_str() {
            "login" => Ok(Self::Login(payload(envelope.data)?)),
            "send_message" => Ok(Self::SendMessage(payload(envelope.data)?)),
            "fetch_messages" => Ok(Self::FetchMessages(payload(envelope.data)?)),
            other => Err(format!("unknown event: {other}")),
        }
    }
}

/// A chat message as it travels over the wire.
///
/// `id` and `created_at` are store-assigned at insert time; the broadcast
/// payload and any later history fetch carry identical values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Store-assigned monotonically increasing id.
    pub id: i64,
    /// Sender wallet address.
    pub sender: String,
    /// Message text.
    pub content: String,
    /// Store-assigned creation timestamp (ISO-8601 on the wire).
    pub created_at: DateTime<Utc>,
}

/// Events sent from the server to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Login accepted; echoes the wallet back to the caller only.
    LoginSuccess {
        /// The validated wallet address now bound to the session.
        wallet: String,
    },

    /// A message was posted; sent to every connected session.
    NewMessage(MessageRecord),

    /// Message history, newest first; sent to the caller only.
    Messages(Vec<MessageRecord>),

    /// Request failed; sent to the caller only.
    Error {
        /// Client-safe failure description.
        message: String,
    },
}

impl ServerEvent {
    /// Builds the outbound `error` event for a handler failure.
    #[must_use]
    pub fn from_error(err: &crate::error::GatewayError) -> Self {
        Self::Error {
            message: err.client_message().to_string(),
        }
    }
}
