//! Static world data and the deterministic random source.
//!
//! Map and monster records are produced by content loaders and consumed by
//! the engine at construction; nothing here changes during play.
mod map;
mod monsters;
mod rng;

pub use map::{EntitySpec, MapDefinition};
pub use monsters::{MonsterCatalog, MonsterRewards, MonsterStats, MonsterTemplate};
pub use rng::{GameRng, PcgRng, RngOracle, RollContext, compute_seed};
