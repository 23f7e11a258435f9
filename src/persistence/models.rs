//! Database row models for users and messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::event::MessageRecord;

/// A stored message row from the `messages` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRow {
    /// Auto-increment row id; the sole ordering authority for messages.
    pub id: i64,
    /// Sender wallet address (foreign reference to `users.wallet`).
    pub sender_wallet: String,
    /// Message text.
    pub content: String,
    /// Store-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<MessageRow> for MessageRecord {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            sender: row.sender_wallet,
            content: row.content,
            created_at: row.created_at,
        }
    }
}
