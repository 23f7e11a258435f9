//! Gateway error types with client-visible message mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Validation
//! failures carry a specific, client-safe message; store and internal
//! failures are collapsed into a generic `"Internal server error"` so that
//! backend detail never leaks over the wire (it is logged server-side
//! instead).

/// Server-side error enum for every fallible chat operation.
///
/// Each event handler returns this type; the WebSocket connection loop is
/// the failure boundary that converts it into a single outbound `error`
/// event via [`GatewayError::client_message`].
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Wallet address failed the base-58 format check (or was absent).
    #[error("invalid wallet address")]
    InvalidWallet,

    /// Message content was missing or whitespace-only.
    #[error("message content is empty")]
    EmptyMessage,

    /// Message content exceeded the maximum length.
    #[error("message content too long")]
    MessageTooLong,

    /// Persistent store failure (connectivity, constraint, transaction).
    #[error("store error: {0}")]
    Store(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the message sent to the client in the `error` event.
    ///
    /// Validation variants map to their specific messages; everything else
    /// maps to a generic `"Internal server error"` — failure details stay
    /// in the server logs.
    #[must_use]
    pub const fn client_message(&self) -> &'static str {
        match self {
            Self::InvalidWallet => "Invalid wallet address",
            Self::EmptyMessage => "Message cannot be empty",
            Self::MessageTooLong => "Message too long",
            Self::Store(_) | Self::Internal(_) => "Internal server error",
        }
    }

    /// Returns `true` if this is a client-input validation failure.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidWallet | Self::EmptyMessage | Self::MessageTooLong
        )
    }
}

impl From<sqlx::Error> for GatewayError {
    fn from(err: sqlx::Error) -> Self {
        Self::Store(err.to_string())
    }
}
