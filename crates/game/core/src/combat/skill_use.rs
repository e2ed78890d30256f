use crate::combatant::Combatant;
use crate::config::GameConfig;
use crate::stats::{Skill, highest_governing};

/// What using a skill produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkillEffect {
    Damage(u32),
    Magical { power: u32 },
    Stealth { bonus: u32 },
    Defense { bonus: u32 },
    General { bonus: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkillUse {
    pub skill: Skill,
    pub cost: u32,
    /// Best governing attribute plus twice the skill level.
    pub total_bonus: u32,
    pub effect: SkillEffect,
    /// Leaves a sound event behind.
    pub loud: bool,
}

/// Trained skills cost one action point, untrained ones two.
pub const fn skill_cost(level: u8) -> u32 {
    if level > 0 {
        GameConfig::ACTION_COST
    } else {
        GameConfig::UNTRAINED_SKILL_COST
    }
}

pub fn plan_skill_use(user: &Combatant, skill: Skill) -> SkillUse {
    let level = user.skills.level(skill);
    let total_bonus = highest_governing(&user.attributes, skill) + u32::from(level) * 2;
    let effect = match skill {
        Skill::LightMelee => SkillEffect::Damage(total_bonus / 2 + 5),
        Skill::HeavyMelee => SkillEffect::Damage(total_bonus / 2 + 8),
        Skill::Arcane | Skill::Abjuration | Skill::Channel => SkillEffect::Magical { power: total_bonus },
        Skill::Stealth => SkillEffect::Stealth { bonus: total_bonus },
        Skill::Block => SkillEffect::Defense { bonus: total_bonus },
        _ => SkillEffect::General { bonus: total_bonus },
    };
    SkillUse {
        skill,
        cost: skill_cost(level),
        total_bonus,
        effect,
        loud: skill.is_loud(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::EntityId;
    use crate::stats::Archetype;

    #[test]
    fn untrained_skills_cost_double() {
        assert_eq!(skill_cost(0), 2);
        assert_eq!(skill_cost(3), 1);
    }

    #[test]
    fn heavy_melee_is_loud_damage() {
        let mut thorin = Combatant::character(EntityId(1), "Thorin", Archetype::Warrior);
        thorin.skills.set(Skill::HeavyMelee, 2);
        let planned = plan_skill_use(&thorin, Skill::HeavyMelee);
        assert_eq!(planned.total_bonus, 14 + 4);
        assert_eq!(planned.effect, SkillEffect::Damage(9 + 8));
        assert_eq!(planned.cost, 1);
        assert!(planned.loud);
    }

    #[test]
    fn arcane_is_magical() {
        let zara = Combatant::character(EntityId(2), "Zara", Archetype::Mage);
        let planned = plan_skill_use(&zara, Skill::Arcane);
        assert_eq!(planned.effect, SkillEffect::Magical { power: 16 });
        assert_eq!(planned.cost, 2);
    }

    #[test]
    fn quiet_skills_leave_no_sound() {
        let shadow = Combatant::character(EntityId(3), "Shadow", Archetype::Rogue);
        let planned = plan_skill_use(&shadow, Skill::Stealth);
        assert_eq!(planned.effect, SkillEffect::Stealth { bonus: 16 });
        assert!(!planned.loud);
    }
}
