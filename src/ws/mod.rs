//! WebSocket layer: connection handling and event dispatch.
//!
//! The WebSocket endpoint at `/ws` carries the entire chat protocol:
//! `login`, `send_message`, and `fetch_messages` inbound; `login_success`,
//! `new_message`, `messages`, and `error` outbound.

pub mod connection;
pub mod handler;
