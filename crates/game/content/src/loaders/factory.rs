//! Content factory resolving data files with built-in fallbacks.

use std::path::{Path, PathBuf};

use game_core::{GameConfig, MapDefinition, MonsterCatalog};

use crate::loaders::{ConfigLoader, LoadResult, MapLoader, MonsterLoader};
use crate::roster::{fallback_catalog, fallback_map};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── monsters.ron
/// └── maps/
///     ├── crypt.ron
///     └── keep.ron
/// ```
///
/// The `load_*` methods report every failure. The `*_or_default` variants log
/// a warning and hand back built-in content instead, so a session can always
/// start.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load(&self.config_path())
    }

    /// Load the monster catalog from `monsters.ron`.
    pub fn load_monsters(&self) -> LoadResult<MonsterCatalog> {
        MonsterLoader::load(&self.monsters_path())
    }

    /// Load a map from `maps/{map_name}.ron`.
    pub fn load_map(&self, map_name: &str) -> LoadResult<MapDefinition> {
        MapLoader::load(&self.map_path(map_name))
    }

    pub fn config_or_default(&self) -> GameConfig {
        self.load_config().unwrap_or_else(|err| {
            tracing::warn!(
                target: "content::loaders",
                path = %self.config_path().display(),
                error = %format!("{err:#}"),
                "config unavailable, using defaults"
            );
            GameConfig::default()
        })
    }

    /// Catalog from disk, or the built-in one when the file is missing,
    /// broken or lists no monsters.
    pub fn monsters_or_default(&self) -> MonsterCatalog {
        match self.load_monsters() {
            Ok(catalog) if !catalog.is_empty() => catalog,
            Ok(_) => {
                tracing::warn!(
                    target: "content::loaders",
                    path = %self.monsters_path().display(),
                    "monster catalog is empty, using built-in catalog"
                );
                fallback_catalog()
            }
            Err(err) => {
                tracing::warn!(
                    target: "content::loaders",
                    path = %self.monsters_path().display(),
                    error = %format!("{err:#}"),
                    "monster catalog unavailable, using built-in catalog"
                );
                fallback_catalog()
            }
        }
    }

    pub fn map_or_default(&self, map_name: &str) -> MapDefinition {
        self.load_map(map_name).unwrap_or_else(|err| {
            tracing::warn!(
                target: "content::loaders",
                map = map_name,
                error = %format!("{err:#}"),
                "map unavailable, using fallback level"
            );
            fallback_map()
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.toml")
    }

    fn monsters_path(&self) -> PathBuf {
        self.data_dir.join("monsters.ron")
    }

    fn map_path(&self, map_name: &str) -> PathBuf {
        self.data_dir.join("maps").join(format!("{map_name}.ron"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
        assert_eq!(
            factory.map_path("crypt"),
            Path::new("/tmp/data/maps/crypt.ron")
        );
    }

    #[test]
    fn empty_directory_falls_back_to_built_in_content() {
        let dir = tempfile::tempdir().expect("temp dir");
        let factory = ContentFactory::new(dir.path());

        assert!(factory.load_config().is_err());
        assert_eq!(factory.config_or_default(), GameConfig::default());
        assert_eq!(factory.monsters_or_default(), fallback_catalog());
        assert_eq!(factory.map_or_default("crypt"), fallback_map());
    }

    #[test]
    fn files_on_disk_take_precedence() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("config.toml"), "seed = 7\n").expect("write config");
        std::fs::write(dir.path().join("monsters.ron"), r#"{ "rat": (name: "Rat") }"#)
            .expect("write catalog");
        std::fs::create_dir(dir.path().join("maps")).expect("maps dir");
        std::fs::write(
            dir.path().join("maps").join("cell.ron"),
            r####"(name: "cell", rows: ["###", "#.#", "###"])"####,
        )
        .expect("write map");

        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.config_or_default().seed, 7);
        assert!(factory.monsters_or_default().get("rat").is_some());
        assert_eq!(factory.map_or_default("cell").name, "cell");
    }

    #[test]
    fn empty_catalog_is_replaced() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("monsters.ron"), "{}").expect("write catalog");
        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.monsters_or_default(), fallback_catalog());
    }
}
