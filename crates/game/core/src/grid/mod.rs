//! Grid & borders model: tiles, directional edges, occupancy and sound.
mod border;
mod map;
mod sound;
mod tile;

pub use border::{Border, BorderKind};
pub use map::{GridMap, MapError, Occupants};
pub use sound::{SoundEvent, SoundSource};
pub use tile::{Tile, TileKind};
