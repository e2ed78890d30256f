use super::{DefenseKind, roll_defense};
use crate::combatant::{Capabilities, Combatant};
use crate::dice::{pool_size, roll_pool};
use crate::env::GameRng;
use crate::state::EntityId;
use crate::stats::Skill;

/// How an attacker converts an attack into damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackMode {
    /// Successes of a skill roll become damage; the defender does not roll.
    Dice { skill: Skill, pool: u32 },
    /// Flat damage reduced by the defender's defense-roll successes.
    Flat { damage: u32 },
}

/// Attacker-side numbers captured before the defender is mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackProfile {
    pub attacker: EntityId,
    pub mode: AttackMode,
}

impl AttackProfile {
    pub fn of(attacker: &Combatant) -> Self {
        let mode = if attacker
            .capabilities()
            .contains(Capabilities::USES_DICE_ATTACK)
        {
            let skill = attacker.attack_skill();
            AttackMode::Dice {
                skill,
                pool: pool_size(&attacker.attributes, &attacker.skills, skill),
            }
        } else {
            AttackMode::Flat {
                damage: attacker.flat_damage(),
            }
        };
        Self {
            attacker: attacker.id,
            mode,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackReport {
    pub attacker: EntityId,
    pub target: EntityId,
    pub damage: u32,
    /// Successes rolled by the attacker (dice mode only).
    pub attack_successes: u32,
    /// Successes rolled by the defender (flat mode only).
    pub defense_successes: u32,
    pub killed: bool,
}

/// Resolves one attack against `target` and applies the damage.
pub fn resolve_attack(rng: &mut GameRng, profile: AttackProfile, target: &mut Combatant) -> AttackReport {
    let (raw, attack_successes, defense_successes) = match profile.mode {
        AttackMode::Dice { pool, .. } => {
            let roll = roll_pool(rng, profile.attacker, pool);
            (roll.successes, roll.successes, 0)
        }
        AttackMode::Flat { damage } => {
            let defense = roll_defense(rng, target, DefenseKind::Block);
            (damage.saturating_sub(defense.successes), 0, defense.successes)
        }
    };
    let damage = target.take_damage(raw);
    AttackReport {
        attacker: profile.attacker,
        target: target.id,
        damage,
        attack_successes,
        defense_successes,
        killed: !target.is_alive(),
    }
}
