//! Board change notifications.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`BoardEvent`] -- the change events fanned out to team subscribers.

pub mod bus;

pub use bus::{BoardEvent, EventBus, DEFAULT_CAPACITY};
