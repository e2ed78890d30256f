//! File-based SaveRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use super::{RepositoryError, Result, SaveGame, SaveRepository};

/// Stores the save as pretty-printed JSON in `savegame.json`.
///
/// Writes go to a temporary file that is renamed over the previous save, so
/// an interrupted write never leaves a half-written save behind.
pub struct FileSaveRepository {
    path: PathBuf,
}

impl FileSaveRepository {
    pub const FILE_NAME: &'static str = "savegame.json";

    /// Create a repository rooted at `base_dir`, creating the directory.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        fs::create_dir_all(base_dir)?;
        Ok(Self {
            path: base_dir.join(Self::FILE_NAME),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SaveRepository for FileSaveRepository {
    fn save(&self, save: &SaveGame) -> Result<()> {
        let temp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_vec_pretty(save)?;

        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;

        tracing::debug!(
            target: "runtime::repository",
            path = %self.path.display(),
            round = save.round,
            "saved game"
        );
        Ok(())
    }

    fn load(&self) -> Result<Option<SaveGame>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.path)?;
        let save: SaveGame = serde_json::from_slice(&bytes)?;
        tracing::debug!(
            target: "runtime::repository",
            path = %self.path.display(),
            version = save.version.as_str(),
            "loaded game"
        );
        Ok(Some(save))
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn delete(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(RepositoryError::Io)?;
            tracing::debug!(target: "runtime::repository", path = %self.path.display(), "deleted save");
        }
        Ok(())
    }
}
