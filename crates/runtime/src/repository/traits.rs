//! Repository contract for persisting the single save slot.

use super::{Result, SaveGame};

/// Storage for the save game.
///
/// `load` reports what is stored; deciding whether a stored save is usable
/// (see [`SaveGame::is_compatible`]) is up to the caller.
pub trait SaveRepository: Send + Sync {
    fn save(&self, save: &SaveGame) -> Result<()>;

    /// `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<SaveGame>>;

    fn exists(&self) -> bool;

    fn delete(&self) -> Result<()>;
}
