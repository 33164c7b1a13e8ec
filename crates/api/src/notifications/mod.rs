//! Delivery of board events to connected clients.
//!
//! The [`BoardEventRelay`] subscribes to the event bus and forwards each
//! event to the WebSocket connections subscribed to the event's team.

pub mod relay;

pub use relay::BoardEventRelay;
