//! Runtime configuration read from the process environment.
use std::env;
use std::path::PathBuf;

use directories::ProjectDirs;

/// Where content and saves live, and how a session behaves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub data_dir: PathBuf,
    pub save_dir: PathBuf,
    pub log_dir: PathBuf,
    /// Map loaded when there is no save to resume.
    pub map_name: String,
    /// Overrides the seed from `config.toml`.
    pub seed: Option<u64>,
    pub autosave: bool,
    /// Rounds the headless driver plays before stopping.
    pub rounds: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let (save_dir, log_dir) = match ProjectDirs::from("", "", "dungeon") {
            Some(dirs) => (dirs.data_dir().join("saves"), dirs.data_local_dir().join("logs")),
            None => (PathBuf::from("saves"), PathBuf::from("logs")),
        };
        Self {
            data_dir: PathBuf::from("data"),
            save_dir,
            log_dir,
            map_name: Self::DEFAULT_MAP.to_string(),
            seed: None,
            autosave: true,
            rounds: Self::DEFAULT_ROUNDS,
        }
    }
}

impl RuntimeConfig {
    pub const DEFAULT_MAP: &'static str = "crypt";
    pub const DEFAULT_ROUNDS: u64 = 20;

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `DATA_DIR` - Content directory (default: `data`)
    /// - `SAVE_DIR` - Directory for the save file (default: platform-specific)
    /// - `LOG_DIR` - Directory for log files (default: platform-specific)
    /// - `MAP_NAME` - Map to start on without a save (default: `crypt`)
    /// - `GAME_SEED` - Seed override for every roll
    /// - `AUTOSAVE` - Save after party changes (default: true)
    /// - `ROUNDS` - Rounds the headless driver plays (default: 20)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = read_env::<PathBuf>("DATA_DIR") {
            config.data_dir = dir;
        }
        if let Some(dir) = read_env::<PathBuf>("SAVE_DIR") {
            config.save_dir = dir;
        }
        if let Some(dir) = read_env::<PathBuf>("LOG_DIR") {
            config.log_dir = dir;
        }
        if let Some(name) = read_env::<String>("MAP_NAME").filter(|name| !name.is_empty()) {
            config.map_name = name;
        }
        config.seed = read_env::<u64>("GAME_SEED");
        if let Some(autosave) = read_env::<bool>("AUTOSAVE") {
            config.autosave = autosave;
        }
        if let Some(rounds) = read_env::<u64>("ROUNDS") {
            config.rounds = rounds.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
