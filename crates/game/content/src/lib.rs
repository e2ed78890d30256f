//! Data-driven content and the built-in defaults.
//!
//! This crate turns files under the data directory into `game-core` records:
//! - Game configuration (TOML)
//! - Map layouts with borders and enemy placements (RON)
//! - The monster catalog (RON)
//!
//! The [`roster`] module carries the content that exists without any files:
//! the default party, a fallback level and a fallback monster catalog.
//! Loaders are behind the `loaders` feature.

pub mod roster;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use roster::{
    DEFAULT_GROUP_SIZE, DEFAULT_ROSTER, RosterEntry, default_group, default_roster,
    fallback_catalog, fallback_map,
};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, MapLoader, MonsterLoader};
