//! Archetypes, experience curve and skill improvement gating.
use strum::{AsRefStr, Display, EnumIter, EnumString};

use super::{AttributeSet, Skill, SkillLevels, SkillPools};
use crate::config::GameConfig;

/// Character class. Enemies use [`Archetype::Monster`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter, EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Archetype {
    Warrior,
    Mage,
    Rogue,
    Cleric,
    Monster,
}

impl Archetype {
    /// Skill points granted at creation.
    pub const fn starting_pools(self) -> SkillPools {
        match self {
            Archetype::Warrior => SkillPools::new(4, 2, 0),
            Archetype::Cleric => SkillPools::new(2, 2, 2),
            Archetype::Rogue => SkillPools::new(2, 4, 0),
            Archetype::Mage => SkillPools::new(0, 2, 4),
            Archetype::Monster => SkillPools::new(2, 2, 2),
        }
    }

    /// Skill points granted on each level-up.
    pub const fn level_up_bonus(self) -> SkillPools {
        match self {
            Archetype::Warrior => SkillPools::new(1, 1, 0),
            Archetype::Cleric => SkillPools::new(0, 1, 1),
            Archetype::Rogue => SkillPools::new(0, 2, 0),
            Archetype::Mage => SkillPools::new(0, 0, 2),
            Archetype::Monster => SkillPools::new(1, 1, 0),
        }
    }

    /// Attribute spread for freshly created characters.
    pub const fn base_attributes(self) -> AttributeSet {
        match self {
            Archetype::Warrior => AttributeSet::new(14, 12, 10, 12, 8, 10),
            Archetype::Mage => AttributeSet::new(8, 10, 16, 14, 12, 10),
            Archetype::Rogue => AttributeSet::new(10, 16, 12, 10, 8, 12),
            Archetype::Cleric => AttributeSet::new(12, 10, 12, 14, 14, 12),
            Archetype::Monster => AttributeSet::uniform(AttributeSet::DEFAULT_VALUE),
        }
    }
}

/// Experience needed to leave `level`.
pub const fn experience_to_next(level: u32) -> u32 {
    level * GameConfig::EXPERIENCE_PER_LEVEL
}

/// Highest value among the skill's governing attributes.
pub fn highest_governing(attributes: &AttributeSet, skill: Skill) -> u32 {
    skill
        .attributes()
        .iter()
        .map(|attribute| attributes.get(*attribute))
        .max()
        .unwrap_or(0)
}

/// Minimum governing attribute needed to raise a skill currently at `level`.
pub const fn attribute_threshold(level: u8) -> u32 {
    level as u32 / 2 + 8
}

/// Why a skill cannot be improved right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ImproveBlocker {
    #[error("no {0} skill points left")]
    PoolEmpty(super::SkillGroup),
    #[error("already at maximum level")]
    MaxLevel,
    #[error("requires an attribute of at least {required}")]
    AttributeTooLow { required: u32 },
}

/// Checks every gate for raising `skill` by one level.
pub fn check_improve(
    skill: Skill,
    skills: &SkillLevels,
    pools: &SkillPools,
    attributes: &AttributeSet,
) -> Result<(), ImproveBlocker> {
    let group = skill.group();
    if pools.remaining(group) == 0 {
        return Err(ImproveBlocker::PoolEmpty(group));
    }
    let level = skills.level(skill);
    if level >= GameConfig::MAX_SKILL_LEVEL {
        return Err(ImproveBlocker::MaxLevel);
    }
    let required = attribute_threshold(level);
    if highest_governing(attributes, skill) < required {
        return Err(ImproveBlocker::AttributeTooLow { required });
    }
    Ok(())
}
