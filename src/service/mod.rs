//! Service layer: event handlers coordinating validation, persistence,
//! and broadcast.

pub mod chat_service;

pub use chat_service::ChatService;
