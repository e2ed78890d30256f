//! Combatant arena plus the map they stand on.
//!
//! The arena owns every combatant by id; the map only indexes positions. All
//! position changes go through [`World`] so the combatant's `position` and the
//! map's occupancy index never disagree.
use std::collections::BTreeMap;

use crate::combatant::{Combatant, Item};
use crate::error::{ErrorSeverity, GameError};
use crate::grid::{GridMap, MapError};
use crate::state::{EntityId, Position};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    #[error("no combatant with id {0}")]
    UnknownEntity(EntityId),

    #[error("{0} is not on the map")]
    NotOnMap(EntityId),

    #[error(transparent)]
    Map(#[from] MapError),
}

impl GameError for WorldError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownEntity(_) => ErrorSeverity::Validation,
            Self::NotOnMap(_) => ErrorSeverity::Recoverable,
            Self::Map(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownEntity(_) => "WORLD_UNKNOWN_ENTITY",
            Self::NotOnMap(_) => "WORLD_NOT_ON_MAP",
            Self::Map(err) => err.error_code(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct World {
    map: GridMap,
    combatants: BTreeMap<EntityId, Combatant>,
    ground_items: BTreeMap<Position, Vec<Item>>,
    next_id: u32,
}

impl World {
    pub fn new(map: GridMap) -> Self {
        Self {
            map,
            combatants: BTreeMap::new(),
            ground_items: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut GridMap {
        &mut self.map
    }

    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Adds a combatant to the arena. A stored position is placed on the map;
    /// if that cell cannot take it the combatant is kept off the map.
    pub fn insert(&mut self, mut combatant: Combatant) -> EntityId {
        let id = combatant.id;
        self.next_id = self.next_id.max(id.0.saturating_add(1));
        if let Some(pos) = combatant.position
            && (!combatant.is_alive() || self.map.place(id, pos).is_err())
        {
            combatant.position = None;
        }
        self.combatants.insert(id, combatant);
        id
    }

    /// Adds a combatant and places it at `pos`. Nothing is inserted on failure.
    pub fn spawn(&mut self, mut combatant: Combatant, pos: Position) -> Result<EntityId, WorldError> {
        let id = combatant.id;
        self.map.place(id, pos)?;
        combatant.position = Some(pos);
        self.next_id = self.next_id.max(id.0.saturating_add(1));
        self.combatants.insert(id, combatant);
        Ok(id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Combatant> {
        self.combatants.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        self.combatants.get_mut(&id)
    }

    pub fn combatants(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.values()
    }

    pub fn combatants_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.combatants.values_mut()
    }

    pub fn combatants_at(&self, pos: Position) -> impl Iterator<Item = &Combatant> {
        self.map
            .occupants(pos)
            .iter()
            .filter_map(|id| self.combatants.get(id))
    }

    /// Living characters currently on the map, in id order.
    pub fn living_characters(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants
            .values()
            .filter(|c| c.is_character() && c.is_alive() && c.position.is_some())
    }

    /// Ids of living enemies, in id order.
    pub fn living_enemy_ids(&self) -> Vec<EntityId> {
        self.combatants
            .values()
            .filter(|c| c.is_enemy() && c.is_alive())
            .map(|c| c.id)
            .collect()
    }

    /// Puts an off-map combatant onto the map.
    pub fn place(&mut self, id: EntityId, pos: Position) -> Result<(), WorldError> {
        let combatant = self
            .combatants
            .get_mut(&id)
            .ok_or(WorldError::UnknownEntity(id))?;
        if let Some(current) = combatant.position {
            self.map.remove(id, current);
            combatant.position = None;
        }
        self.map.place(id, pos)?;
        combatant.position = Some(pos);
        Ok(())
    }

    /// Takes a combatant off the map but keeps it in the arena.
    pub fn remove_from_map(&mut self, id: EntityId) -> Option<Position> {
        let combatant = self.combatants.get_mut(&id)?;
        let pos = combatant.position.take()?;
        self.map.remove(id, pos);
        Some(pos)
    }

    /// Removes a combatant from both the arena and the map.
    pub fn despawn(&mut self, id: EntityId) -> Option<Combatant> {
        self.remove_from_map(id);
        self.combatants.remove(&id)
    }

    /// True if a combatant could step from `from` into the cardinal neighbour `to`.
    pub fn can_step(&self, from: Position, to: Position) -> bool {
        self.map.can_traverse(from, to) && self.map.is_walkable(to)
    }

    /// Moves a combatant one cell. The map index and the combatant's position
    /// change together or not at all.
    pub fn step(&mut self, id: EntityId, to: Position) -> Result<Position, WorldError> {
        let combatant = self
            .combatants
            .get_mut(&id)
            .ok_or(WorldError::UnknownEntity(id))?;
        let from = combatant.position.ok_or(WorldError::NotOnMap(id))?;
        self.map.relocate(id, from, to)?;
        combatant.position = Some(to);
        Ok(from)
    }

    // ===== loot =====

    pub fn drop_item(&mut self, pos: Position, item: Item) {
        self.ground_items.entry(pos).or_default().push(item);
    }

    /// Loot piles in position order, oldest item first.
    pub fn ground_items(&self) -> impl Iterator<Item = (Position, &[Item])> {
        self.ground_items
            .iter()
            .map(|(pos, items)| (*pos, items.as_slice()))
    }

    pub fn items_at(&self, pos: Position) -> &[Item] {
        self.ground_items
            .get(&pos)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Removes the most recently dropped item at `pos`.
    pub fn take_item(&mut self, pos: Position) -> Option<Item> {
        let pile = self.ground_items.get_mut(&pos)?;
        let item = pile.pop();
        if pile.is_empty() {
            self.ground_items.remove(&pos);
        }
        item
    }
}
