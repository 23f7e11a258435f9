//! # relay-gateway
//!
//! Real-time chat relay over WebSocket with wallet-based identity and
//! PostgreSQL persistence.
//!
//! Clients connect to `/ws`, optionally `login` with a base-58 wallet
//! address (format-checked only, never cryptographically verified), post
//! messages with `send_message`, and request history with
//! `fetch_messages`. Every posted message is broadcast to all connected
//! sessions; the store's sequential id assignment is the only ordering
//! authority.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, /health)
//!     │
//!     ├── WS connection loop (ws/)
//!     ├── ChatService handlers (service/)
//!     │
//!     ├── SessionRegistry + wire events (domain/)
//!     │
//!     └── PostgresStore (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
