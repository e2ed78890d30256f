//! Combatants: the shared record behind player characters and enemies.
//!
//! Variant-specific behaviour is selected by [`CombatantKind`] and summarised
//! as [`Capabilities`]; there is no trait-object hierarchy.
mod enemy;
mod equipment;
mod inventory;
mod status;

pub use enemy::EnemyProfile;
pub use equipment::{Equipment, EquipmentSlot, Item, ItemKind, StatBonus, WeaponCategory};
pub use inventory::Inventory;
pub use status::{StatusEffect, StatusEffects, StatusKind, StatusTick};

use bitflags::bitflags;

use crate::ai::AiState;
use crate::config::GameConfig;
use crate::env::MonsterTemplate;
use crate::state::{EntityId, Position, ResourceMeter};
use crate::stats::{
    Archetype, AttributeSet, DerivedStats, ImproveBlocker, Skill, SkillLevels, SkillPools,
    check_improve, experience_to_next,
};

bitflags! {
    /// Behaviour switches derived from the combatant variant.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Driven by the enemy decision machine.
        const HAS_AI = 1 << 0;
        /// Attacks roll a skill pool; otherwise damage is the flat attack stat.
        const USES_DICE_ATTACK = 1 << 1;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CombatantKind {
    Character,
    Enemy(Box<EnemyProfile>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: EntityId,
    pub name: String,
    pub archetype: Archetype,
    pub kind: CombatantKind,
    /// Cell on the current map, `None` while off the map (benched or dead).
    pub position: Option<Position>,
    pub level: u32,
    pub experience: u32,
    pub attributes: AttributeSet,
    pub skills: SkillLevels,
    pub skill_pools: SkillPools,
    pub hp: ResourceMeter,
    pub action_points: ResourceMeter,
    pub reactions: ResourceMeter,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub equipment: Equipment,
    pub inventory: Inventory,
    pub status_effects: StatusEffects,
    pub gold: u32,
}

impl Combatant {
    /// New level-1 character with the archetype's attribute spread.
    pub fn character(id: EntityId, name: impl Into<String>, archetype: Archetype) -> Self {
        Self::character_with(id, name, archetype, archetype.base_attributes())
    }

    pub fn character_with(
        id: EntityId,
        name: impl Into<String>,
        archetype: Archetype,
        attributes: AttributeSet,
    ) -> Self {
        let mut combatant = Self {
            id,
            name: name.into(),
            archetype,
            kind: CombatantKind::Character,
            position: None,
            level: 1,
            experience: 0,
            attributes,
            skills: SkillLevels::new(),
            skill_pools: archetype.starting_pools(),
            hp: ResourceMeter::default(),
            action_points: ResourceMeter::default(),
            reactions: ResourceMeter::default(),
            attack: 0,
            defense: 0,
            speed: 0,
            equipment: Equipment::default(),
            inventory: Inventory::new(),
            status_effects: StatusEffects::default(),
            gold: 0,
        };
        combatant.recompute_stats();
        combatant.hp.restore();
        combatant.action_points.restore();
        combatant.reactions.restore();
        combatant
    }

    /// New enemy instance built from a catalog template.
    pub fn enemy(
        id: EntityId,
        name: impl Into<String>,
        monster_type: &str,
        template: &MonsterTemplate,
        origin: Position,
        config: &GameConfig,
    ) -> Self {
        let stats = &template.stats;
        let patrol_radius = match template.ai {
            crate::ai::AiBehavior::Guard => config.guard_patrol_radius,
            _ => config.patrol_radius,
        };
        let profile = EnemyProfile {
            monster_type: monster_type.to_string(),
            behavior: template.ai,
            aggression: template.aggression,
            state: AiState::Idle,
            vision_range: stats.vision_range,
            sound_range: stats.sound_range,
            attack_range: stats.attack_range,
            patrol_radius,
            origin,
            target: None,
            last_seen: None,
            stun_ticks: 0,
            loot_table: template.loot_table.clone(),
            drop_chance_percent: template
                .drop_chance_percent
                .unwrap_or(config.default_drop_chance_percent)
                .min(100),
            experience_value: template.experience_value(),
            gold_value: template.gold_value(),
        };
        let mut combatant = Self {
            id,
            name: name.into(),
            archetype: Archetype::Monster,
            kind: CombatantKind::Enemy(Box::new(profile)),
            position: None,
            level: template.level.max(1),
            experience: 0,
            attributes: template.attributes,
            skills: SkillLevels::new(),
            skill_pools: SkillPools::default(),
            hp: ResourceMeter::full(stats.max_hp),
            action_points: ResourceMeter::full(stats.max_action_points),
            reactions: ResourceMeter::full(template.attributes.max_reactions()),
            attack: stats.attack,
            defense: stats.defense,
            speed: stats.speed,
            equipment: Equipment::default(),
            inventory: Inventory::new(),
            status_effects: StatusEffects::default(),
            gold: 0,
        };
        if let Some(weapon) = template.weapon.clone() {
            // A template weapon always has a slot; anything else is ignored.
            let _ = combatant.equip(weapon);
        }
        combatant
    }

    pub fn capabilities(&self) -> Capabilities {
        match self.kind {
            CombatantKind::Character => Capabilities::USES_DICE_ATTACK,
            CombatantKind::Enemy(_) => Capabilities::HAS_AI,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp.current > 0
    }

    pub fn is_character(&self) -> bool {
        matches!(self.kind, CombatantKind::Character)
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.kind, CombatantKind::Enemy(_))
    }

    pub fn enemy_profile(&self) -> Option<&EnemyProfile> {
        match &self.kind {
            CombatantKind::Enemy(profile) => Some(profile),
            CombatantKind::Character => None,
        }
    }

    pub fn enemy_profile_mut(&mut self) -> Option<&mut EnemyProfile> {
        match &mut self.kind {
            CombatantKind::Enemy(profile) => Some(profile),
            CombatantKind::Character => None,
        }
    }

    // ===== stats =====

    /// Recomputes derived stats for characters. Enemy stats come from their
    /// template and are left alone.
    pub fn recompute_stats(&mut self) {
        if !self.is_character() {
            return;
        }
        let derived = DerivedStats::compute(&self.attributes, &self.skills, self.level);
        let bonus = self.equipment.bonus();
        self.hp.set_maximum(derived.max_hp + bonus.hp);
        self.action_points.set_maximum(derived.max_action_points);
        self.reactions.set_maximum(derived.max_reactions);
        self.attack = derived.attack + bonus.attack;
        self.defense = derived.defense + bonus.defense;
        self.speed = derived.speed;
    }

    pub fn stealth_level(&self) -> u32 {
        u32::from(self.skills.level(Skill::Stealth))
    }

    /// Skill rolled for attacks with the equipped weapon.
    pub fn attack_skill(&self) -> Skill {
        match self.equipment.weapon_category() {
            Some(WeaponCategory::Heavy) => Skill::HeavyMelee,
            Some(WeaponCategory::Light) => Skill::LightMelee,
            Some(WeaponCategory::Ranged { .. }) => Skill::Ranged,
            None => Skill::UnarmedCombat,
        }
    }

    /// Reach of attacks with the equipped weapon.
    pub fn weapon_range(&self) -> u32 {
        match self.equipment.weapon_category() {
            Some(WeaponCategory::Ranged { range }) => range.max(1),
            _ => 1,
        }
    }

    /// Flat damage dealt by non-dice attacks, never below 1.
    pub fn flat_damage(&self) -> u32 {
        (self.attack + self.status_effects.attack_bonus()).max(1)
    }

    // ===== resources =====

    pub fn spend_action_points(&mut self, amount: u32) -> bool {
        self.action_points.try_spend(amount)
    }

    pub fn restore_action_points(&mut self) {
        self.action_points.restore();
    }

    pub fn spend_reaction(&mut self) -> bool {
        self.reactions.try_spend(1)
    }

    pub fn restore_reactions(&mut self) {
        self.reactions.restore();
    }

    /// Applies damage and returns how much HP was actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.hp.drain(amount)
    }

    pub fn heal(&mut self, amount: u32) -> u32 {
        if !self.is_alive() {
            return 0;
        }
        self.hp.fill(amount)
    }

    /// Runs one round of status effects against this combatant.
    pub fn tick_status_effects(&mut self) -> StatusTick {
        let tick = self.status_effects.tick();
        self.take_damage(tick.damage);
        self.heal(tick.healing);
        tick
    }

    // ===== progression =====

    /// Adds experience and returns the number of levels gained.
    pub fn gain_experience(&mut self, amount: u32) -> u32 {
        if !self.is_character() {
            return 0;
        }
        self.experience += amount;
        let mut gained = 0;
        while self.experience >= experience_to_next(self.level) {
            self.experience -= experience_to_next(self.level);
            self.level_up();
            gained += 1;
        }
        gained
    }

    fn level_up(&mut self) {
        self.level += 1;
        self.skill_pools.grant(self.archetype.level_up_bonus());
        self.recompute_stats();
        self.hp.restore();
        self.action_points.restore();
    }

    pub fn can_improve_skill(&self, skill: Skill) -> bool {
        check_improve(skill, &self.skills, &self.skill_pools, &self.attributes).is_ok()
    }

    /// Raises a skill by one level, spending a point from its group pool.
    /// Returns the new level; nothing changes when a gate fails.
    pub fn improve_skill(&mut self, skill: Skill) -> Result<u8, ImproveBlocker> {
        check_improve(skill, &self.skills, &self.skill_pools, &self.attributes)?;
        self.skill_pools.try_spend(skill.group());
        let level = self.skills.level(skill) + 1;
        self.skills.set(skill, level);
        self.recompute_stats();
        Ok(level)
    }

    // ===== equipment =====

    /// Equips an item, applying its bonus and returning the replaced item.
    pub fn equip(&mut self, item: Item) -> Result<Option<Item>, Item> {
        let bonus = item.bonus;
        let replaced = self.equipment.equip(item)?;
        if let Some(old) = &replaced {
            self.remove_bonus(old.bonus);
        }
        self.apply_bonus(bonus);
        Ok(replaced)
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<Item> {
        let item = self.equipment.unequip(slot)?;
        self.remove_bonus(item.bonus);
        Some(item)
    }

    fn apply_bonus(&mut self, bonus: StatBonus) {
        self.hp.set_maximum(self.hp.maximum + bonus.hp);
        self.attack += bonus.attack;
        self.defense += bonus.defense;
    }

    fn remove_bonus(&mut self, bonus: StatBonus) {
        self.hp.set_maximum(self.hp.maximum.saturating_sub(bonus.hp));
        self.attack = self.attack.saturating_sub(bonus.attack);
        self.defense = self.defense.saturating_sub(bonus.defense);
    }
}
