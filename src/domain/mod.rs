//! Domain layer: session identity, live-connection registry, wire events,
//! and wallet address validation.
//!
//! This module contains the server-side domain model: opaque session ids,
//! the registry that owns all live-connection state, the event types that
//! cross the WebSocket, and the pure wallet format check.

pub mod event;
pub mod registry;
pub mod session;
pub mod wallet;

pub use registry::SessionRegistry;
pub use session::SessionId;
