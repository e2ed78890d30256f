//! Content loaders for reading game data from files.
//!
//! Each loader reads one file format into a `game-core` record. Failures carry
//! the offending path through `anyhow` context; deciding what to do about a
//! missing or broken file is left to [`ContentFactory`].

pub mod config;
pub mod factory;
pub mod map;
pub mod monsters;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use map::{BorderSpec, EntityPlacement, MapFile, MapLoader};
pub use monsters::MonsterLoader;

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}
