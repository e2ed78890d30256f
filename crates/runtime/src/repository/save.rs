//! Serialized form of a session.

use std::time::{SystemTime, UNIX_EPOCH};

use game_core::{Combatant, EntityId, GameEngine, LevelState};
use serde::{Deserialize, Serialize};

/// Saves written with any other version are ignored on load.
pub const SAVE_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveGame {
    pub version: String,
    /// Every character, benched ones carrying the cell they return to.
    pub roster: Vec<Combatant>,
    pub group: Vec<EntityId>,
    pub active_index: usize,
    pub map_name: String,
    /// Map edits, enemies, loot and sounds. Missing in saves that only kept
    /// the party; those rebuild the level from its definition.
    #[serde(default)]
    pub level: Option<LevelState>,
    pub round: u64,
    /// Seconds since the Unix epoch.
    pub saved_at: u64,
}

impl SaveGame {
    pub fn capture(engine: &GameEngine, map_name: &str) -> Self {
        let party = engine.party();
        Self {
            version: SAVE_VERSION.to_string(),
            roster: engine.roster_snapshot(),
            group: party.group().to_vec(),
            active_index: party.active_index(),
            map_name: map_name.to_string(),
            level: Some(engine.level_state()),
            round: engine.round(),
            saved_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs())
                .unwrap_or_default(),
        }
    }

    pub fn is_compatible(&self) -> bool {
        self.version == SAVE_VERSION
    }
}
