//! Topic-based event bus for domain events.
//!
//! Events are published under their [`GameEventKind`](game_core::GameEventKind)
//! and consumers subscribe to the kinds they need, or to every event.

mod bus;

pub use bus::{EventBus, HandlerError, PublishReport, SubscriptionId, Topic};
