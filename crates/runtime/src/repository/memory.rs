//! In-memory SaveRepository implementation for tests and local runs.

use std::sync::RwLock;

use super::{RepositoryError, Result, SaveGame, SaveRepository};

#[derive(Default)]
pub struct InMemorySaveRepository {
    slot: RwLock<Option<SaveGame>>,
}

impl InMemorySaveRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_save(save: SaveGame) -> Self {
        Self {
            slot: RwLock::new(Some(save)),
        }
    }
}

impl SaveRepository for InMemorySaveRepository {
    fn save(&self, save: &SaveGame) -> Result<()> {
        let mut slot = self.slot.write().map_err(|_| RepositoryError::LockPoisoned)?;
        *slot = Some(save.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<SaveGame>> {
        let slot = self.slot.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(slot.clone())
    }

    fn exists(&self) -> bool {
        self.slot.read().map(|slot| slot.is_some()).unwrap_or(false)
    }

    fn delete(&self) -> Result<()> {
        let mut slot = self.slot.write().map_err(|_| RepositoryError::LockPoisoned)?;
        *slot = None;
        Ok(())
    }
}
