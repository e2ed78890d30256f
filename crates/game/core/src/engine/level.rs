//! Level state that outlives a session: map edits, living enemies, loot and
//! noise.
use super::GameEngine;
use crate::combatant::{Combatant, Item};
use crate::config::GameConfig;
use crate::env::{MapDefinition, MonsterCatalog};
use crate::grid::{MapError, SoundEvent};
use crate::state::Position;

/// Items lying on one cell.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroundPile {
    pub position: Position,
    pub items: Vec<Item>,
}

/// Snapshot of a level in play.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelState {
    /// Tiles and borders as they are now. `entities` is always empty.
    pub map: MapDefinition,
    pub spawn_point: Option<Position>,
    /// Living enemies on the map, with their ids, health and AI state.
    pub enemies: Vec<Combatant>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ground_items: Vec<GroundPile>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sounds: Vec<SoundEvent>,
}

impl GameEngine {
    pub fn level_state(&self) -> LevelState {
        let map = self.world.map();
        LevelState {
            map: map.to_definition(),
            spawn_point: map.spawn_point(),
            enemies: self
                .world
                .combatants()
                .filter(|c| c.is_enemy() && c.is_alive() && c.position.is_some())
                .cloned()
                .collect(),
            ground_items: self
                .world
                .ground_items()
                .map(|(position, items)| GroundPile {
                    position,
                    items: items.to_vec(),
                })
                .collect(),
            sounds: map.sounds().to_vec(),
        }
    }

    /// Rebuilds a level from a snapshot with `roster` enlisted. Entities listed
    /// by the snapshot's map are ignored; enemies come back exactly as stored.
    /// An enemy whose id is taken or whose cell cannot take it is dropped.
    pub fn resume(
        level: LevelState,
        catalog: MonsterCatalog,
        config: GameConfig,
        roster: Vec<Combatant>,
    ) -> Result<Self, MapError> {
        let LevelState {
            mut map,
            spawn_point,
            enemies,
            ground_items,
            sounds,
        } = level;
        map.entities.clear();
        let mut engine = Self::with_roster(&map, catalog, config, roster)?;

        if !engine.world.map_mut().set_spawn_point(spawn_point) {
            tracing::warn!(target: "game::engine", ?spawn_point, "stored spawn point rejected");
        }
        engine.world.map_mut().replace_sounds(sounds);

        for enemy in enemies {
            let id = enemy.id;
            if !enemy.is_enemy() || !enemy.is_alive() || engine.world.get(id).is_some() {
                tracing::warn!(target: "game::engine", enemy = %id, "stored enemy skipped");
                continue;
            }
            engine.world.insert(enemy);
            if engine.world.get(id).is_some_and(|c| c.position.is_none()) {
                tracing::warn!(target: "game::engine", enemy = %id, "stored enemy could not be placed");
                engine.world.despawn(id);
            }
        }
        for pile in ground_items {
            for item in pile.items {
                engine.world.drop_item(pile.position, item);
            }
        }

        tracing::info!(
            target: "game::engine",
            map = map.name.as_str(),
            enemies = engine.world.living_enemy_ids().len(),
            "level resumed"
        );
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiState;
    use crate::combatant::ItemKind;
    use crate::env::MonsterTemplate;
    use crate::grid::{Border, SoundSource};
    use crate::state::{Direction, EntityId};
    use crate::stats::Archetype;

    fn catalog() -> MonsterCatalog {
        let mut catalog = MonsterCatalog::new();
        catalog.insert("goblin", MonsterTemplate::fallback("Goblin"));
        catalog
    }

    fn thorin() -> Combatant {
        let mut thorin = Combatant::character(EntityId(1), "Thorin", Archetype::Warrior);
        thorin.position = Some(Position::new(1, 1));
        thorin
    }

    #[test]
    fn resumed_level_keeps_edits_enemies_and_loot() {
        let mut definition = MapDefinition::open("crypt", 6, 4);
        definition.vertical_borders = vec![vec![Border::NONE, Border::door(false)]];
        let mut engine =
            GameEngine::with_roster(&definition, catalog(), GameConfig::default(), vec![thorin()])
                .expect("valid map");
        let goblin = engine.spawn_enemy("goblin", Position::new(4, 3)).expect("spawned");
        if let Some(enemy) = engine.world.get_mut(goblin) {
            enemy.hp.current = 2;
            if let Some(profile) = enemy.enemy_profile_mut() {
                profile.state = AiState::Chase;
            }
        }
        engine.world.map_mut().destroy_door(Position::new(1, 0), Direction::East);
        engine.world.drop_item(Position::new(3, 3), Item::new("Gem", ItemKind::Treasure));
        engine
            .world
            .map_mut()
            .add_sound(Position::new(2, 2), 1, SoundSource::DoorBash, 2);

        let level = engine.level_state();
        assert!(level.map.entities.is_empty());
        let resumed =
            GameEngine::resume(level, catalog(), GameConfig::default(), vec![thorin()]).expect("valid map");

        assert_eq!(resumed.map().border_at(Position::new(2, 0), Direction::West), Border::NONE);
        let enemy = resumed.world().get(goblin).expect("goblin kept its id");
        assert_eq!(enemy.hp.current, 2);
        assert_eq!(enemy.position, Some(Position::new(4, 3)));
        assert_eq!(enemy.enemy_profile().map(|p| p.state), Some(AiState::Chase));
        assert_eq!(resumed.world().living_enemy_ids(), vec![goblin]);
        assert_eq!(resumed.world().items_at(Position::new(3, 3)).len(), 1);
        assert_eq!(resumed.map().sounds().len(), 1);
        assert_eq!(resumed.map().spawn_point(), engine.map().spawn_point());
    }

    #[test]
    fn enemy_clashing_with_a_character_id_is_dropped() {
        let definition = MapDefinition::open("crypt", 4, 4);
        let mut engine =
            GameEngine::new(&definition, catalog(), GameConfig::default()).expect("valid map");
        let goblin = engine.spawn_enemy("goblin", Position::new(3, 3)).expect("spawned");
        assert_eq!(goblin, EntityId(1));

        let level = engine.level_state();
        let resumed =
            GameEngine::resume(level, catalog(), GameConfig::default(), vec![thorin()]).expect("valid map");
        assert!(resumed.world().get(EntityId(1)).is_some_and(Combatant::is_character));
        assert!(resumed.world().living_enemy_ids().is_empty());
    }
}
