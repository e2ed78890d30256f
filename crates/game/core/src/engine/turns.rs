//! Round cycle: player phase, enemy phase, upkeep and spawning.
use super::GameEngine;
use crate::ai;
use crate::env::RollContext;
use crate::events::GameEvent;
use crate::state::EntityId;

/// Result of asking to end the player phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The group still has action points; call
    /// [`GameEngine::confirm_end_turn`] to end the round anyway.
    ConfirmationRequired { remaining: u32 },
    /// The round finished and `round` is the one that just ended.
    RoundEnded { round: u64 },
}

impl GameEngine {
    pub fn end_turn(&mut self) -> TurnOutcome {
        let remaining = self.remaining_action_points();
        if remaining > 0 {
            return TurnOutcome::ConfirmationRequired { remaining };
        }
        self.end_round()
    }

    pub fn confirm_end_turn(&mut self) -> TurnOutcome {
        self.end_round()
    }

    fn end_round(&mut self) -> TurnOutcome {
        let finished = self.round;
        tracing::debug!(target: "game::engine", round = finished, "round ending");
        self.events.push(GameEvent::RoundEnded { round: finished });

        self.world.map_mut().tick_sounds();
        self.run_enemy_phase();
        self.tick_status_effects();
        self.refresh_group();
        if !self.party.group().is_empty() {
            // Index 0 always exists in a non-empty group.
            let _ = self.switch_active(0);
        }
        self.attempt_spawn();

        self.round += 1;
        self.events.push(GameEvent::RoundStarted { round: self.round });
        tracing::info!(
            target: "game::engine",
            round = self.round,
            enemies = self.world.living_enemy_ids().len(),
            "round started"
        );
        TurnOutcome::RoundEnded { round: finished }
    }

    /// Each living enemy acts to exhaustion before the next one starts.
    fn run_enemy_phase(&mut self) {
        for enemy in self.world.living_enemy_ids() {
            let Some(combatant) = self.world.get_mut(enemy) else {
                continue;
            };
            if !combatant.is_alive() {
                continue;
            }
            combatant.restore_action_points();
            combatant.restore_reactions();

            let mut rules = self.rules();
            let mut ticks = 0u32;
            while ai::run_tick(&mut rules, enemy) {
                ticks += 1;
            }
            tracing::trace!(target: "game::ai", enemy = %enemy, ticks, "enemy done");
        }
    }

    fn tick_status_effects(&mut self) {
        let mut fallen: Vec<EntityId> = Vec::new();
        for combatant in self.world.combatants_mut() {
            if !combatant.is_alive() || combatant.position.is_none() {
                continue;
            }
            let tick = combatant.tick_status_effects();
            if tick.damage > 0 && !combatant.is_alive() {
                fallen.push(combatant.id);
            }
        }
        for id in fallen {
            self.rules().kill(id, None);
        }
    }

    /// Restores action points and reactions for living group members.
    fn refresh_group(&mut self) {
        for id in self.party.group().to_vec() {
            if let Some(member) = self.world.get_mut(id)
                && member.is_alive()
            {
                member.restore_action_points();
                member.restore_reactions();
            }
        }
    }

    /// Spawns a random catalog monster at the spawn point when it exists and
    /// is empty, the enemy cap is not reached and the spawn roll passes.
    pub(super) fn attempt_spawn(&mut self) -> Option<EntityId> {
        let spawn = self.world.map().spawn_point()?;
        if self.world.living_enemy_ids().len() >= self.config.max_enemies {
            return None;
        }
        if self.world.map().occupant_count(spawn) > 0 {
            return None;
        }
        if !self
            .rng
            .chance(0, RollContext::Spawn, self.config.spawn_chance_percent)
        {
            return None;
        }
        let monster_type = self.catalog.random_type(&mut self.rng)?.to_string();
        self.spawn_enemy(&monster_type, spawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiState;
    use crate::engine::ActionError;
    use crate::combatant::{Combatant, StatusEffect, StatusKind};
    use crate::config::GameConfig;
    use crate::env::{MapDefinition, MonsterCatalog, MonsterTemplate};
    use crate::grid::SoundSource;
    use crate::state::Position;
    use crate::stats::Archetype;

    fn quiet_config() -> GameConfig {
        GameConfig {
            spawn_chance_percent: 0,
            ..GameConfig::default()
        }
    }

    fn catalog() -> MonsterCatalog {
        let mut catalog = MonsterCatalog::new();
        catalog.insert("goblin", MonsterTemplate::fallback("Goblin"));
        catalog
    }

    fn party_of_three(config: GameConfig) -> (GameEngine, Vec<EntityId>) {
        let mut engine =
            GameEngine::new(&MapDefinition::open("keep", 12, 12), catalog(), config).expect("valid map");
        let cast = [
            ("Thorin", Archetype::Warrior, Position::new(6, 6)),
            ("Zara", Archetype::Mage, Position::new(7, 6)),
            ("Shadow", Archetype::Rogue, Position::new(6, 7)),
        ];
        let ids: Vec<EntityId> = cast
            .into_iter()
            .map(|(name, archetype, at)| {
                let id = engine.world.allocate_id();
                let mut character = Combatant::character(id, name, archetype);
                character.position = Some(at);
                engine.enlist(character)
            })
            .collect();
        engine.set_group(&ids).expect("valid group");
        engine.drain_events();
        (engine, ids)
    }

    fn drain_points(engine: &mut GameEngine, ids: &[EntityId], leave: &[u32]) {
        for (id, left) in ids.iter().zip(leave) {
            if let Some(member) = engine.world.get_mut(*id) {
                member.action_points.current = *left;
                member.reactions.current = 0;
            }
        }
    }

    #[test]
    fn remaining_points_require_confirmation() {
        let (mut engine, ids) = party_of_three(quiet_config());
        drain_points(&mut engine, &ids, &[1, 0, 1]);

        assert_eq!(engine.end_turn(), TurnOutcome::ConfirmationRequired { remaining: 2 });
        assert_eq!(engine.round(), 1);
        assert!(engine.drain_events().is_empty());

        assert_eq!(engine.confirm_end_turn(), TurnOutcome::RoundEnded { round: 1 });
        assert_eq!(engine.round(), 2);
    }

    #[test]
    fn exhausted_group_ends_round_and_enemies_act() {
        let (mut engine, ids) = party_of_three(quiet_config());
        let goblin = engine.spawn_enemy("goblin", Position::new(1, 1)).expect("spawned");
        engine.switch_active(2).expect("index");
        drain_points(&mut engine, &ids, &[0, 0, 0]);
        engine.drain_events();

        assert_eq!(engine.end_turn(), TurnOutcome::RoundEnded { round: 1 });

        for id in &ids {
            let member = engine.world().get(*id).expect("exists");
            assert_eq!(member.action_points.current, member.action_points.maximum);
            assert_eq!(member.reactions.current, member.reactions.maximum);
        }
        assert_eq!(engine.party().active_index(), 0);
        let goblin = engine.world().get(goblin).expect("still alive");
        assert_eq!(goblin.action_points.current, 0);

        let events = engine.drain_events();
        assert_eq!(events.first(), Some(&GameEvent::RoundEnded { round: 1 }));
        assert_eq!(events.last(), Some(&GameEvent::RoundStarted { round: 2 }));
    }

    #[test]
    fn enemy_in_sight_closes_in_during_its_phase() {
        let (mut engine, ids) = party_of_three(quiet_config());
        let goblin = engine.spawn_enemy("goblin", Position::new(6, 3)).expect("spawned");
        drain_points(&mut engine, &ids, &[0, 0, 0]);

        engine.end_turn();

        let state = engine
            .world()
            .get(goblin)
            .and_then(|c| c.enemy_profile())
            .map(|p| p.state);
        assert!(matches!(state, Some(AiState::MeleeAttack)));
        assert_eq!(engine.world().get(goblin).and_then(|c| c.position), Some(Position::new(6, 5)));
    }

    #[test]
    fn stunned_enemy_holds_its_ground_for_the_phase() {
        let (mut engine, ids) = party_of_three(quiet_config());
        let goblin = engine.spawn_enemy("goblin", Position::new(6, 3)).expect("spawned");
        assert_eq!(engine.stun_enemy(ids[0], 2), Err(ActionError::InvalidTarget(ids[0])));
        engine.stun_enemy(goblin, 10).expect("living enemy");
        drain_points(&mut engine, &ids, &[0, 0, 0]);

        engine.end_turn();

        let enemy = engine.world().get(goblin).expect("still alive");
        assert_eq!(enemy.position, Some(Position::new(6, 3)));
        let stun = enemy.enemy_profile().map(|p| p.stun_ticks).expect("enemy");
        assert_eq!(stun, 10 - enemy.action_points.maximum);
    }

    #[test]
    fn sounds_fade_each_round() {
        let (mut engine, ids) = party_of_three(quiet_config());
        engine
            .world
            .map_mut()
            .add_sound(Position::new(0, 0), 1, SoundSource::DoorBash, 2);
        drain_points(&mut engine, &ids, &[0, 0, 0]);
        engine.end_turn();
        assert_eq!(engine.map().sounds()[0].remaining, 1);
        drain_points(&mut engine, &ids, &[0, 0, 0]);
        engine.end_turn();
        assert!(engine.map().sounds().is_empty());
    }

    #[test]
    fn poison_can_finish_a_combatant_at_round_end() {
        let (mut engine, ids) = party_of_three(quiet_config());
        let goblin = engine.spawn_enemy("goblin", Position::new(0, 11)).expect("spawned");
        if let Some(enemy) = engine.world.get_mut(goblin) {
            enemy.hp.current = 2;
            enemy.status_effects.apply(StatusEffect {
                kind: StatusKind::Poison,
                magnitude: 5,
                duration: 2,
            });
        }
        drain_points(&mut engine, &ids, &[0, 0, 0]);
        engine.end_turn();

        assert!(engine.world().get(goblin).is_none());
        assert!(engine.drain_events().iter().any(|event| matches!(
            event,
            GameEvent::CombatantDied { combatant, .. } if *combatant == goblin
        )));
    }

    #[test]
    fn spawner_respects_cap_and_empty_cell() {
        let config = GameConfig {
            spawn_chance_percent: 100,
            max_enemies: 1,
            ..GameConfig::default()
        };
        let (mut engine, _) = party_of_three(config);
        let spawn = engine.map().spawn_point().expect("open map has one");

        if engine.map().occupant_count(spawn) == 0 {
            let first = engine.attempt_spawn().expect("roll always passes");
            assert_eq!(engine.world().get(first).and_then(|c| c.position), Some(spawn));
        }
        assert_eq!(engine.attempt_spawn(), None);
    }
}
