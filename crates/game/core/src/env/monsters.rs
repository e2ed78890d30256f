//! Monster catalog: named enemy templates loaded from content files.
use std::collections::BTreeMap;

use crate::ai::{Aggression, AiBehavior};
use crate::combatant::Item;
use crate::env::{GameRng, RollContext};
use crate::stats::AttributeSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MonsterStats {
    pub max_hp: u32,
    pub max_action_points: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub attack_range: u32,
    pub vision_range: u32,
    pub sound_range: u32,
}

impl Default for MonsterStats {
    fn default() -> Self {
        Self {
            max_hp: 22,
            max_action_points: 3,
            attack: 10,
            defense: 5,
            speed: 1,
            attack_range: 1,
            vision_range: 3,
            sound_range: 6,
        }
    }
}

/// Kill rewards. Missing values scale with the monster's level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MonsterRewards {
    pub experience: Option<u32>,
    pub gold: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MonsterTemplate {
    pub name: String,
    pub description: String,
    pub level: u32,
    pub attributes: AttributeSet,
    pub stats: MonsterStats,
    pub ai: AiBehavior,
    pub aggression: Aggression,
    pub rewards: MonsterRewards,
    pub weapon: Option<Item>,
    pub loot_table: Vec<Item>,
    /// Falls back to the configured default when absent.
    pub drop_chance_percent: Option<u32>,
    /// Display names picked at random for each spawned instance.
    pub variants: Vec<String>,
}

impl Default for MonsterTemplate {
    fn default() -> Self {
        Self {
            name: "Monster".to_string(),
            description: String::new(),
            level: 1,
            attributes: AttributeSet::default(),
            stats: MonsterStats::default(),
            ai: AiBehavior::Patrol,
            aggression: Aggression::Aggressive,
            rewards: MonsterRewards::default(),
            weapon: None,
            loot_table: Vec::new(),
            drop_chance_percent: None,
            variants: Vec::new(),
        }
    }
}

impl MonsterTemplate {
    /// Stand-in used when a map or spawner names a type the catalog lacks.
    pub fn fallback(monster_type: &str) -> Self {
        Self {
            name: monster_type.to_string(),
            ..Self::default()
        }
    }

    pub fn experience_value(&self) -> u32 {
        self.rewards.experience.unwrap_or(self.level * 10)
    }

    pub fn gold_value(&self) -> u32 {
        self.rewards.gold.unwrap_or(self.level * 5)
    }
}

/// Templates keyed by monster type. Iteration order is the key order, which
/// keeps random picks reproducible for a given seed.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterCatalog {
    pub monsters: BTreeMap<String, MonsterTemplate>,
}

impl MonsterCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, monster_type: impl Into<String>, template: MonsterTemplate) {
        self.monsters.insert(monster_type.into(), template);
    }

    pub fn get(&self, monster_type: &str) -> Option<&MonsterTemplate> {
        self.monsters.get(monster_type)
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.monsters.keys().map(String::as_str)
    }

    /// Template for `monster_type`, or the fallback template when unknown.
    pub fn template_or_fallback(&self, monster_type: &str) -> MonsterTemplate {
        match self.get(monster_type) {
            Some(template) => template.clone(),
            None => {
                tracing::warn!(
                    target: "game::monsters",
                    monster_type,
                    "unknown monster type, using fallback template"
                );
                MonsterTemplate::fallback(monster_type)
            }
        }
    }

    pub fn random_type(&self, rng: &mut GameRng) -> Option<&str> {
        if self.monsters.is_empty() {
            return None;
        }
        let index = rng.index(0, RollContext::Spawn, self.monsters.len());
        self.types().nth(index)
    }

    /// Random variant name for a template, or its base name when it has none.
    pub fn random_variant(template: &MonsterTemplate, rng: &mut GameRng) -> String {
        if template.variants.is_empty() {
            return template.name.clone();
        }
        let index = rng.index(0, RollContext::Spawn, template.variants.len());
        template.variants[index].clone()
    }
}
