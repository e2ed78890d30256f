//! Stats computed from attributes, skills and level. Never stored as truth.
use super::{AttributeSet, Skill, SkillLevels};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedStats {
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub max_action_points: u32,
    pub max_reactions: u32,
}

impl DerivedStats {
    pub fn compute(attributes: &AttributeSet, skills: &SkillLevels, level: u32) -> Self {
        let skill = |s: Skill| u32::from(skills.level(s));
        Self {
            max_hp: 10 + attributes.body + level * 2,
            attack: attributes.body * 2 + attributes.agility + skill(Skill::HeavyMelee) * 3,
            defense: 3 + attributes.body + attributes.agility + skill(Skill::Dodge) * 2,
            speed: 1 + attributes.agility / 5 + skill(Skill::Athletics),
            max_action_points: 3 + attributes.agility / 8 + attributes.willpower / 10,
            max_reactions: attributes.max_reactions(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_character() {
        let stats = DerivedStats::compute(&AttributeSet::default(), &SkillLevels::new(), 1);
        assert_eq!(stats.max_hp, 22);
        assert_eq!(stats.attack, 30);
        assert_eq!(stats.defense, 23);
        assert_eq!(stats.speed, 3);
        assert_eq!(stats.max_action_points, 5);
        assert_eq!(stats.max_reactions, 5);
    }

    #[test]
    fn trained_skills_feed_combat_stats() {
        let skills = SkillLevels::new()
            .with(Skill::HeavyMelee, 2)
            .with(Skill::Dodge, 1)
            .with(Skill::Athletics, 3);
        let stats = DerivedStats::compute(&AttributeSet::default(), &skills, 1);
        assert_eq!(stats.attack, 36);
        assert_eq!(stats.defense, 25);
        assert_eq!(stats.speed, 6);
    }
}
