//! Dice-pool skill resolution.
//!
//! A check rolls one d6 per point of pool; every 5 or 6 is a success. The pool
//! for a skill is the *sum* of its governing attributes plus the skill level.
use std::str::FromStr;

use crate::config::GameConfig;
use crate::env::GameRng;
use crate::state::EntityId;
use crate::stats::{AttributeSet, Skill, SkillLevels};

/// Outcome of one pool roll.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct DiceRoll {
    pub successes: u32,
    pub dice: Vec<u32>,
}

impl DiceRoll {
    /// A roll that never happened (empty pool, no reaction left).
    pub fn none() -> Self {
        Self::default()
    }
}

/// Number of dice a combatant rolls for `skill`.
pub fn pool_size(attributes: &AttributeSet, skills: &SkillLevels, skill: Skill) -> u32 {
    let attribute_total: u32 = skill
        .attributes()
        .iter()
        .map(|attribute| attributes.get(*attribute))
        .sum();
    attribute_total + u32::from(skills.level(skill))
}

pub fn roll_pool(rng: &mut GameRng, roller: EntityId, dice: u32) -> DiceRoll {
    let dice: Vec<u32> = (0..dice)
        .map(|_| rng.roll_die(roller.0, GameConfig::DIE_SIDES))
        .collect();
    let successes = dice
        .iter()
        .filter(|face| **face >= GameConfig::SUCCESS_THRESHOLD)
        .count() as u32;
    DiceRoll { successes, dice }
}

pub fn roll_skill(
    rng: &mut GameRng,
    roller: EntityId,
    attributes: &AttributeSet,
    skills: &SkillLevels,
    skill: Skill,
) -> DiceRoll {
    roll_pool(rng, roller, pool_size(attributes, skills, skill))
}

/// Rolls a skill given by catalog name. Unknown names roll zero dice.
pub fn roll_skill_named(
    rng: &mut GameRng,
    roller: EntityId,
    attributes: &AttributeSet,
    skills: &SkillLevels,
    name: &str,
) -> DiceRoll {
    match Skill::from_str(name) {
        Ok(skill) => roll_skill(rng, roller, attributes, skills, skill),
        Err(_) => {
            tracing::warn!(target: "game::dice", skill = name, roller = %roller, "unknown skill, rolling empty pool");
            DiceRoll::none()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_sums_all_governing_attributes() {
        let attributes = AttributeSet::new(10, 6, 10, 10, 9, 10);
        let skills = SkillLevels::new().with(Skill::Dodge, 2);
        assert_eq!(pool_size(&attributes, &skills, Skill::Dodge), 17);
    }

    #[test]
    fn zero_pool_has_no_dice_and_no_successes() {
        let mut rng = GameRng::new(5);
        let roll = roll_skill(
            &mut rng,
            EntityId(1),
            &AttributeSet::uniform(0),
            &SkillLevels::new(),
            Skill::Lore,
        );
        assert_eq!(roll, DiceRoll::none());
    }

    #[test]
    fn unknown_skill_name_falls_back_to_empty_roll() {
        let mut rng = GameRng::new(5);
        let roll = roll_skill_named(
            &mut rng,
            EntityId(1),
            &AttributeSet::default(),
            &SkillLevels::new(),
            "juggling",
        );
        assert_eq!(roll.successes, 0);
        assert!(roll.dice.is_empty());
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn successes_count_fives_and_sixes() {
        let mut rng = GameRng::new(9);
        let roll = roll_pool(&mut rng, EntityId(2), 40);
        let expected = roll.dice.iter().filter(|d| **d >= 5).count() as u32;
        assert_eq!(roll.successes, expected);
        assert!(roll.dice.iter().all(|d| (1..=6).contains(d)));
    }

    #[test]
    fn success_rate_approximates_one_third() {
        let mut rng = GameRng::new(2024);
        let trials = 4_000;
        let dice_per_roll = 6;
        let total: u32 = (0..trials)
            .map(|_| roll_pool(&mut rng, EntityId(3), dice_per_roll).successes)
            .sum();
        let mean = f64::from(total) / f64::from(trials);
        // Binomial(6, 1/3) has mean 2.0 and standard error ~0.018 over 4000 trials.
        assert!((mean - 2.0).abs() < 0.1, "mean successes {mean}");
    }
}
