//! Turn/round controller and the player-facing mutation entry points.
//!
//! [`GameEngine`] owns the world, the party, the random source and the event
//! buffer. Every entry point validates first and mutates second, returning
//! either an [`Outcome`] carrying a player-facing message or an
//! [`ActionError`]. Events produced along the way accumulate until the caller
//! drains them with [`GameEngine::drain_events`].
mod actions;
mod errors;
mod level;
mod party;
mod turns;

pub use actions::DoorAction;
pub use errors::ActionError;
pub use level::{GroundPile, LevelState};
pub use party::{Group, Party};
pub use turns::TurnOutcome;

use std::fmt;

use crate::combatant::Combatant;
use crate::config::GameConfig;
use crate::context::RulesContext;
use crate::env::{GameRng, MapDefinition, MonsterCatalog};
use crate::events::GameEvent;
use crate::grid::{GridMap, MapError};
use crate::state::{EntityId, Position, ResourceMeter};
use crate::world::World;

/// Successful result of an entry point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub message: String,
}

impl Outcome {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Read-only numbers a status bar needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnStats {
    pub round: u64,
    pub active: Option<EntityId>,
    pub active_name: Option<String>,
    pub action_points: Option<ResourceMeter>,
    pub reactions: Option<ResourceMeter>,
    /// Action points left across the whole group.
    pub group_action_points: u32,
    pub living_enemies: usize,
}

pub struct GameEngine {
    world: World,
    party: Party,
    round: u64,
    rng: GameRng,
    config: GameConfig,
    catalog: MonsterCatalog,
    events: Vec<GameEvent>,
}

impl GameEngine {
    /// Builds the level from a map definition and spawns its listed enemies.
    /// The roster starts empty; see [`GameEngine::enlist`].
    pub fn new(
        definition: &MapDefinition,
        catalog: MonsterCatalog,
        config: GameConfig,
    ) -> Result<Self, MapError> {
        Self::with_roster(definition, catalog, config, Vec::new())
    }

    /// Same as [`GameEngine::new`] with `roster` enlisted before the map's
    /// enemies spawn, so stored character ids are kept and enemies are
    /// numbered after them. Everyone starts benched; see
    /// [`GameEngine::set_group`].
    pub fn with_roster(
        definition: &MapDefinition,
        catalog: MonsterCatalog,
        config: GameConfig,
        roster: Vec<Combatant>,
    ) -> Result<Self, MapError> {
        let mut rng = GameRng::new(config.seed);
        let map = GridMap::from_definition(definition, &mut rng)?;
        let mut engine = Self {
            world: World::new(map),
            party: Party::default(),
            round: 1,
            rng,
            config,
            catalog,
            events: Vec::new(),
        };
        for character in roster {
            engine.enlist(character);
        }
        for spec in &definition.entities {
            engine.spawn_enemy(&spec.monster, spec.position);
        }
        tracing::info!(
            target: "game::engine",
            map = definition.name.as_str(),
            enemies = engine.world.living_enemy_ids().len(),
            roster = engine.party.roster().len(),
            seed = engine.config.seed,
            "level ready"
        );
        Ok(engine)
    }

    // ===== queries =====

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn map(&self) -> &GridMap {
        self.world.map()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &MonsterCatalog {
        &self.catalog
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    /// Resumes the round counter from a save.
    pub fn set_round(&mut self, round: u64) {
        self.round = round.max(1);
    }

    pub fn combatant(&self, id: EntityId) -> Option<&Combatant> {
        self.world.get(id)
    }

    pub fn active_member(&self) -> Option<&Combatant> {
        self.party.active().and_then(|id| self.world.get(id))
    }

    pub fn combatants_at(&self, pos: Position) -> impl Iterator<Item = &Combatant> {
        self.world.combatants_at(pos)
    }

    /// Action points left across the group.
    pub fn remaining_action_points(&self) -> u32 {
        self.party
            .group()
            .iter()
            .filter_map(|id| self.world.get(*id))
            .filter(|c| c.is_alive())
            .map(|c| c.action_points.current)
            .sum()
    }

    pub fn stats(&self) -> TurnStats {
        let active = self.active_member();
        TurnStats {
            round: self.round,
            active: active.map(|c| c.id),
            active_name: active.map(|c| c.name.clone()),
            action_points: active.map(|c| c.action_points),
            reactions: active.map(|c| c.reactions),
            group_action_points: self.remaining_action_points(),
            living_enemies: self.world.living_enemy_ids().len(),
        }
    }

    /// Hands over every event buffered since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== internals =====

    fn rules(&mut self) -> RulesContext<'_> {
        RulesContext {
            world: &mut self.world,
            rng: &mut self.rng,
            config: &self.config,
            events: &mut self.events,
        }
    }

    /// Places a new enemy built from the catalog. Unknown types use the
    /// fallback template; a cell that cannot take it is logged and skipped.
    pub fn spawn_enemy(&mut self, monster_type: &str, position: Position) -> Option<EntityId> {
        let template = self.catalog.template_or_fallback(monster_type);
        let name = MonsterCatalog::random_variant(&template, &mut self.rng);
        let id = self.world.allocate_id();
        let enemy = Combatant::enemy(id, name, monster_type, &template, position, &self.config);
        match self.world.spawn(enemy, position) {
            Ok(id) => {
                self.events.push(GameEvent::EnemySpawned {
                    enemy: id,
                    monster_type: monster_type.to_string(),
                    position,
                });
                tracing::debug!(target: "game::engine", enemy = %id, monster_type, %position, "enemy spawned");
                Some(id)
            }
            Err(err) => {
                tracing::warn!(target: "game::engine", monster_type, %position, error = %err, "enemy not placed");
                None
            }
        }
    }

    /// Stuns a living enemy for `duration` of its decision ticks.
    pub fn stun_enemy(&mut self, enemy: EntityId, duration: u32) -> Result<(), ActionError> {
        let combatant = self
            .world
            .get_mut(enemy)
            .ok_or(ActionError::UnknownCombatant(enemy))?;
        if !combatant.is_alive() {
            return Err(ActionError::InvalidTarget(enemy));
        }
        let profile = combatant
            .enemy_profile_mut()
            .ok_or(ActionError::InvalidTarget(enemy))?;
        profile.stun(duration);
        tracing::debug!(target: "game::engine", enemy = %enemy, duration, "enemy stunned");
        Ok(())
    }
}
