//! Domain events emitted by the engine.
//!
//! The engine buffers events while it mutates state; callers drain them after
//! each entry point and fan them out. Nothing in the rules layer consumes them.
use strum::EnumDiscriminants;

use crate::ai::AiState;
use crate::combat::SkillEffect;
use crate::state::{Direction, EntityId, Position};
use crate::stats::Skill;

#[derive(Clone, Debug, PartialEq, Eq, EnumDiscriminants)]
#[strum_discriminants(name(GameEventKind))]
#[strum_discriminants(derive(Hash, PartialOrd, Ord, strum::Display, strum::EnumIter))]
pub enum GameEvent {
    RoundStarted {
        round: u64,
    },
    RoundEnded {
        round: u64,
    },
    ActiveChanged {
        combatant: EntityId,
    },
    GroupChanged {
        members: Vec<EntityId>,
    },
    PlayerMoved {
        combatant: EntityId,
        from: Position,
        to: Position,
    },
    EnemyMoved {
        combatant: EntityId,
        from: Position,
        to: Position,
    },
    PlayerAttacked {
        attacker: EntityId,
        target: EntityId,
        damage: u32,
    },
    EnemyAttacked {
        attacker: EntityId,
        target: EntityId,
        damage: u32,
        /// False when a ranged attack had no range or line of sight.
        landed: bool,
    },
    DoorToggled {
        by: EntityId,
        position: Position,
        direction: Direction,
        open: bool,
    },
    DoorBashed {
        by: EntityId,
        position: Position,
        direction: Direction,
    },
    SkillUsed {
        combatant: EntityId,
        skill: Skill,
        effect: SkillEffect,
    },
    SkillImproved {
        combatant: EntityId,
        skill: Skill,
        level: u8,
    },
    ExperienceGained {
        combatant: EntityId,
        amount: u32,
    },
    LevelUp {
        combatant: EntityId,
        level: u32,
    },
    ItemPickedUp {
        combatant: EntityId,
        item: String,
    },
    LootDropped {
        position: Position,
        item: String,
    },
    EnemySpawned {
        enemy: EntityId,
        monster_type: String,
        position: Position,
    },
    AiStateChanged {
        enemy: EntityId,
        from: AiState,
        to: AiState,
    },
    CombatantDied {
        combatant: EntityId,
        position: Position,
    },
}

impl GameEvent {
    pub fn kind(&self) -> GameEventKind {
        GameEventKind::from(self)
    }
}
