use crate::ai::{Aggression, AiBehavior, AiState, AiTarget};
use crate::combatant::Item;
use crate::state::Position;

/// Enemy-only state carried by [`super::CombatantKind::Enemy`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyProfile {
    /// Catalog key this enemy was created from.
    pub monster_type: String,
    pub behavior: AiBehavior,
    pub aggression: Aggression,
    pub state: AiState,
    pub vision_range: u32,
    pub sound_range: u32,
    pub attack_range: u32,
    pub patrol_radius: u32,
    /// Post the enemy wanders around and returns to.
    pub origin: Position,
    pub target: Option<AiTarget>,
    pub last_seen: Option<Position>,
    /// Remaining ticks of stun.
    pub stun_ticks: u32,
    pub loot_table: Vec<Item>,
    pub drop_chance_percent: u32,
    pub experience_value: u32,
    pub gold_value: u32,
}

impl EnemyProfile {
    pub fn is_stunned(&self) -> bool {
        self.stun_ticks > 0
    }

    /// Skips the next `duration` decision ticks. A longer stun already in
    /// place is kept.
    pub fn stun(&mut self, duration: u32) {
        self.stun_ticks = self.stun_ticks.max(duration);
    }
}
