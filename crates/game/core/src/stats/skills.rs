//! Skill catalog, per-combatant skill levels and group point pools.
use std::collections::BTreeMap;

use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use super::Attribute;
use crate::config::GameConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum SkillGroup {
    Combat,
    General,
    Magic,
}

/// Every skill a combatant can train. All combatants own the full catalog.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, AsRefStr, EnumIter, EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Skill {
    // combat
    HeavyMelee,
    LightMelee,
    UnarmedCombat,
    Ranged,
    Dodge,
    Block,
    // general
    Athletics,
    Stealth,
    Lore,
    Deduction,
    Crafting,
    Medicine,
    Deception,
    Persuasion,
    Intimidation,
    Performance,
    Thievery,
    Perception,
    Survival,
    AnimalHandling,
    // magic
    Abjuration,
    Arcane,
    Alchemy,
    Channel,
    Summoning,
    SecondSight,
    Parma,
    Purification,
    Ritual,
}

impl Skill {
    pub const fn group(self) -> SkillGroup {
        use Skill::*;
        match self {
            HeavyMelee | LightMelee | UnarmedCombat | Ranged | Dodge | Block => SkillGroup::Combat,
            Abjuration | Arcane | Alchemy | Channel | Summoning | SecondSight | Parma
            | Purification | Ritual => SkillGroup::Magic,
            _ => SkillGroup::General,
        }
    }

    /// Attributes that feed this skill's dice pool. Never empty.
    pub const fn attributes(self) -> &'static [Attribute] {
        use Attribute::*;
        match self {
            Skill::HeavyMelee | Skill::UnarmedCombat | Skill::Block => &[Body],
            Skill::LightMelee
            | Skill::Ranged
            | Skill::Athletics
            | Skill::Stealth
            | Skill::Thievery => &[Agility],
            Skill::Dodge => &[Agility, Gnosis],
            Skill::Lore
            | Skill::Deduction
            | Skill::Crafting
            | Skill::Medicine
            | Skill::Abjuration
            | Skill::Arcane
            | Skill::Alchemy
            | Skill::Ritual => &[Intelligence],
            Skill::Deception
            | Skill::Persuasion
            | Skill::Intimidation
            | Skill::Parma
            | Skill::Purification => &[Willpower],
            Skill::Performance | Skill::Channel => &[Soul],
            Skill::Perception
            | Skill::Survival
            | Skill::AnimalHandling
            | Skill::Summoning
            | Skill::SecondSight => &[Gnosis],
        }
    }

    /// Skills whose use makes enough noise to leave a sound event.
    pub const fn is_loud(self) -> bool {
        matches!(
            self,
            Skill::HeavyMelee | Skill::Arcane | Skill::Abjuration | Skill::Channel
        )
    }
}

/// Trained level of every skill; untrained skills are implicitly 0.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SkillLevels {
    levels: BTreeMap<Skill, u8>,
}

impl SkillLevels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self, skill: Skill) -> u8 {
        self.levels.get(&skill).copied().unwrap_or(0)
    }

    /// Sets a level, clamped to the catalog maximum.
    pub fn set(&mut self, skill: Skill, level: u8) {
        let level = level.min(GameConfig::MAX_SKILL_LEVEL);
        if level == 0 {
            self.levels.remove(&skill);
        } else {
            self.levels.insert(skill, level);
        }
    }

    pub fn with(mut self, skill: Skill, level: u8) -> Self {
        self.set(skill, level);
        self
    }

    /// Full catalog with levels, in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (Skill, u8)> + '_ {
        Skill::iter().map(|skill| (skill, self.level(skill)))
    }
}

/// Unspent skill points, one pool per group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillPools {
    pub combat: u32,
    pub general: u32,
    pub magic: u32,
}

impl SkillPools {
    pub const fn new(combat: u32, general: u32, magic: u32) -> Self {
        Self {
            combat,
            general,
            magic,
        }
    }

    pub const fn remaining(&self, group: SkillGroup) -> u32 {
        match group {
            SkillGroup::Combat => self.combat,
            SkillGroup::General => self.general,
            SkillGroup::Magic => self.magic,
        }
    }

    fn slot_mut(&mut self, group: SkillGroup) -> &mut u32 {
        match group {
            SkillGroup::Combat => &mut self.combat,
            SkillGroup::General => &mut self.general,
            SkillGroup::Magic => &mut self.magic,
        }
    }

    pub fn try_spend(&mut self, group: SkillGroup) -> bool {
        let slot = self.slot_mut(group);
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    pub fn grant(&mut self, bonus: SkillPools) {
        self.combat += bonus.combat;
        self.general += bonus.general;
        self.magic += bonus.magic;
    }
}
