//! Unified error type surfaced by the runtime API.
use thiserror::Error;

use game_core::MapError;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("failed to build the level")]
    Level(#[source] MapError),
}
