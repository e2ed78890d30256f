//! Session orchestration around the deterministic game engine.
//!
//! This crate wires the rules library to everything that touches the outside
//! world: content from disk, save files and event fan-out. Consumers embed
//! [`GameSession`] to drive the party and subscribe to domain events through
//! its [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the orchestrator and its action reports
//! - [`events`] provides the topic-based event bus
//! - [`repository`] persists save games
//! - [`config`] reads runtime settings from the environment
pub mod config;
pub mod error;
pub mod events;
pub mod repository;
pub mod session;

pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use events::{EventBus, HandlerError, PublishReport, SubscriptionId, Topic};
pub use repository::{
    FileSaveRepository, InMemorySaveRepository, RepositoryError, SAVE_VERSION, SaveGame,
    SaveRepository,
};
pub use session::{ActionReport, GameSession};
