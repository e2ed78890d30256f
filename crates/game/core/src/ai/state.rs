use crate::state::{EntityId, Position};

/// Decision-machine state of one enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum AiState {
    #[default]
    Idle,
    Patrol,
    Chase,
    Investigate,
    MeleeAttack,
    RangedAttack,
    Guard,
}

impl AiState {
    pub const fn is_attack(self) -> bool {
        matches!(self, AiState::MeleeAttack | AiState::RangedAttack)
    }
}

/// Behaviour tag from the monster template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum AiBehavior {
    #[default]
    Patrol,
    /// Returns to its post instead of wandering when it loses track of a target.
    Guard,
    Idle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Aggression {
    Passive,
    #[default]
    Aggressive,
    Defensive,
}

/// What an enemy is currently pursuing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AiTarget {
    /// A character acquired by vision.
    Combatant(EntityId),
    /// The origin of a sound heard without seeing its source.
    Sound(Position),
}
