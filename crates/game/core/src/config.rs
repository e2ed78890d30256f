/// Game configuration constants and tunable parameters.
///
/// Associated consts are structural limits (they size bounded collections);
/// the fields are balance knobs that content files may override.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Seed for every random roll in the session.
    pub seed: u64,
    /// Chance (0-100) that an enemy spawns at the end of a round.
    pub spawn_chance_percent: u32,
    /// Living enemy cap enforced by the spawner.
    pub max_enemies: usize,
    /// Rounds a freshly emitted sound event stays audible.
    pub sound_duration: u32,
    /// Chance (0-100) that an idle enemy starts patrolling on a tick.
    pub idle_to_patrol_percent: u32,
    /// Wander radius for patrolling enemies.
    pub patrol_radius: u32,
    /// Wander radius for guard-type enemies.
    pub guard_patrol_radius: u32,
    /// Loot drop chance (0-100) for monsters whose template omits one.
    pub default_drop_chance_percent: u32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of combatants sharing one cell.
    pub const MAX_OCCUPANTS_PER_TILE: usize = 16;
    /// Maximum number of characters in the active group.
    pub const MAX_PARTY_SIZE: usize = 3;
    /// Maximum number of items a combatant can carry.
    pub const MAX_INVENTORY_SLOTS: usize = 20;
    /// Maximum number of concurrent status effects per combatant.
    pub const MAX_STATUS_EFFECTS: usize = 8;

    // ===== rule constants =====
    pub const MAX_SKILL_LEVEL: u8 = 5;
    /// Die faces at or above this value count as a success.
    pub const SUCCESS_THRESHOLD: u32 = 5;
    pub const DIE_SIDES: u32 = 6;
    /// Every move, attack, door interaction and pickup costs this much AP.
    pub const ACTION_COST: u32 = 1;
    /// Skill use at level 0 costs more than a trained skill.
    pub const UNTRAINED_SKILL_COST: u32 = 2;
    pub const EXPERIENCE_PER_LEVEL: u32 = 100;

    pub const DOOR_BASH_INTENSITY: u32 = 2;
    pub const LOUD_SKILL_INTENSITY: u32 = 1;

    // ===== defaults =====
    pub const DEFAULT_SEED: u64 = 0x5eed_d00d;
    pub const DEFAULT_SPAWN_CHANCE_PERCENT: u32 = 30;
    pub const DEFAULT_MAX_ENEMIES: usize = 5;
    pub const DEFAULT_SOUND_DURATION: u32 = 3;
    pub const DEFAULT_IDLE_TO_PATROL_PERCENT: u32 = 5;
    pub const DEFAULT_PATROL_RADIUS: u32 = 2;
    pub const DEFAULT_GUARD_PATROL_RADIUS: u32 = 3;
    pub const DEFAULT_DROP_CHANCE_PERCENT: u32 = 30;

    pub fn new() -> Self {
        Self {
            seed: Self::DEFAULT_SEED,
            spawn_chance_percent: Self::DEFAULT_SPAWN_CHANCE_PERCENT,
            max_enemies: Self::DEFAULT_MAX_ENEMIES,
            sound_duration: Self::DEFAULT_SOUND_DURATION,
            idle_to_patrol_percent: Self::DEFAULT_IDLE_TO_PATROL_PERCENT,
            patrol_radius: Self::DEFAULT_PATROL_RADIUS,
            guard_patrol_radius: Self::DEFAULT_GUARD_PATROL_RADIUS,
            default_drop_chance_percent: Self::DEFAULT_DROP_CHANCE_PERCENT,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
