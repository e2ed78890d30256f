use crate::combatant::Combatant;
use crate::dice::{DiceRoll, roll_skill};
use crate::env::GameRng;
use crate::stats::Skill;

/// Defense the defender asks for. Blocking needs a shield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DefenseKind {
    #[default]
    Dodge,
    Block,
}

/// Skill actually rolled for a requested defense.
pub fn defense_skill(defender: &Combatant, requested: DefenseKind) -> Skill {
    match requested {
        DefenseKind::Block if defender.equipment.has_shield() => Skill::Block,
        _ => Skill::Dodge,
    }
}

/// Spends one reaction and rolls the defense. An empty reaction pool means no
/// roll and zero successes.
pub fn roll_defense(rng: &mut GameRng, defender: &mut Combatant, requested: DefenseKind) -> DiceRoll {
    if !defender.spend_reaction() {
        return DiceRoll::none();
    }
    let skill = defense_skill(defender, requested);
    roll_skill(rng, defender.id, &defender.attributes, &defender.skills, skill)
}
