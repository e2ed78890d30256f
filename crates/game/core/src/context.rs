//! Mutable rules context shared by player actions and the enemy phase.
use crate::combat::{AttackProfile, AttackReport, resolve_attack};
use crate::config::GameConfig;
use crate::env::{GameRng, RollContext};
use crate::events::GameEvent;
use crate::state::{EntityId, Position};
use crate::world::{World, WorldError};

/// Borrowed view of everything a rule needs to change the game.
///
/// Built by the engine for the duration of one entry point; it is the only
/// way rules reach the world, the random source and the event buffer.
pub struct RulesContext<'a> {
    pub world: &'a mut World,
    pub rng: &'a mut GameRng,
    pub config: &'a GameConfig,
    pub events: &'a mut Vec<GameEvent>,
}

impl<'a> RulesContext<'a> {
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Moves a combatant one cell and spends the action point for it.
    pub fn step(&mut self, id: EntityId, to: Position) -> Result<Position, WorldError> {
        let from = self.world.step(id, to)?;
        if let Some(combatant) = self.world.get_mut(id) {
            combatant.spend_action_points(GameConfig::ACTION_COST);
        }
        Ok(from)
    }

    /// Resolves an attack and handles a resulting death. Action points are the
    /// caller's concern.
    pub fn attack(&mut self, attacker: EntityId, target: EntityId) -> Option<AttackReport> {
        let profile = AttackProfile::of(self.world.get(attacker)?);
        let victim = self.world.get_mut(target)?;
        let report = resolve_attack(self.rng, profile, victim);
        if report.killed {
            self.kill(target, Some(attacker));
        }
        Some(report)
    }

    /// Takes a dead combatant off the map. Enemies drop loot, reward their
    /// killer and leave the arena; characters stay in the roster at 0 HP.
    pub fn kill(&mut self, victim: EntityId, killer: Option<EntityId>) {
        let Some(position) = self.world.remove_from_map(victim) else {
            return;
        };
        self.emit(GameEvent::CombatantDied {
            combatant: victim,
            position,
        });
        tracing::debug!(target: "game::combat", victim = %victim, killer = ?killer, "combatant died");

        let Some(profile) = self
            .world
            .get(victim)
            .and_then(|c| c.enemy_profile())
            .cloned()
        else {
            return;
        };

        if !profile.loot_table.is_empty()
            && self
                .rng
                .chance(victim.0, RollContext::Loot, profile.drop_chance_percent)
        {
            let index = self
                .rng
                .index(victim.0, RollContext::Loot, profile.loot_table.len());
            let item = profile.loot_table[index].clone();
            self.emit(GameEvent::LootDropped {
                position,
                item: item.name.clone(),
            });
            self.world.drop_item(position, item);
        }

        if let Some(killer) = killer {
            self.reward(killer, profile.experience_value, profile.gold_value);
        }
        self.world.despawn(victim);
    }

    fn reward(&mut self, killer: EntityId, experience: u32, gold: u32) {
        let Some(hero) = self.world.get_mut(killer) else {
            return;
        };
        if !hero.is_character() || !hero.is_alive() {
            return;
        }
        hero.gold += gold;
        let levels = hero.gain_experience(experience);
        let level = hero.level;
        self.emit(GameEvent::ExperienceGained {
            combatant: killer,
            amount: experience,
        });
        for offset in (0..levels).rev() {
            self.emit(GameEvent::LevelUp {
                combatant: killer,
                level: level - offset,
            });
        }
    }
}
