//! Tile grid, border arrays and the spatial occupancy index.
use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use super::{Border, SoundEvent, SoundSource, Tile};
use crate::config::GameConfig;
use crate::env::{GameRng, MapDefinition, RollContext};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{Direction, EntityId, Position};

pub type Occupants = ArrayVec<EntityId, { GameConfig::MAX_OCCUPANTS_PER_TILE }>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("map definition is invalid: {0}")]
    InvalidDefinition(String),

    #[error("{position} is outside the map")]
    OutOfBounds { position: Position },

    #[error("{position} is not walkable")]
    NotWalkable { position: Position },

    #[error("{position} is full")]
    CellFull { position: Position },

    #[error("{entity} is not at {position}")]
    NotOccupant { entity: EntityId, position: Position },
}

impl GameError for MapError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidDefinition(_) => ErrorSeverity::Validation,
            Self::OutOfBounds { .. } | Self::NotWalkable { .. } | Self::CellFull { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::NotOccupant { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDefinition(_) => "MAP_INVALID_DEFINITION",
            Self::OutOfBounds { .. } => "MAP_OUT_OF_BOUNDS",
            Self::NotWalkable { .. } => "MAP_NOT_WALKABLE",
            Self::CellFull { .. } => "MAP_CELL_FULL",
            Self::NotOccupant { .. } => "MAP_NOT_OCCUPANT",
        }
    }
}

/// One loaded dungeon level.
///
/// The map tracks *where* combatants are, never the combatants themselves;
/// the world arena owns them.
#[derive(Clone, Debug)]
pub struct GridMap {
    name: String,
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
    /// `(height - 1) * width` edges between row `y` and `y + 1`.
    horizontal: Vec<Border>,
    /// `height * (width - 1)` edges between column `x` and `x + 1`.
    vertical: Vec<Border>,
    occupancy: BTreeMap<Position, Occupants>,
    spawn_point: Option<Position>,
    sounds: Vec<SoundEvent>,
}

/// Border arrays may be shorter than the grid but never larger.
fn check_border_shape(
    label: &str,
    rows: &[Vec<Border>],
    max_rows: usize,
    max_cols: usize,
) -> Result<(), MapError> {
    if rows.len() > max_rows {
        return Err(MapError::InvalidDefinition(format!(
            "{label} borders have {} rows, at most {max_rows} allowed",
            rows.len()
        )));
    }
    if let Some((y, row)) = rows.iter().enumerate().find(|(_, row)| row.len() > max_cols) {
        return Err(MapError::InvalidDefinition(format!(
            "{label} border row {y} has {} edges, at most {max_cols} allowed",
            row.len()
        )));
    }
    Ok(())
}

impl GridMap {
    /// Builds the grid from a definition and picks a random walkable spawn point.
    pub fn from_definition(def: &MapDefinition, rng: &mut GameRng) -> Result<Self, MapError> {
        if def.width == 0 || def.height == 0 {
            return Err(MapError::InvalidDefinition(format!(
                "dimensions {}x{} are empty",
                def.width, def.height
            )));
        }
        if def.tiles.len() != def.height as usize {
            return Err(MapError::InvalidDefinition(format!(
                "expected {} tile rows, found {}",
                def.height,
                def.tiles.len()
            )));
        }
        if let Some((y, row)) = def
            .tiles
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != def.width as usize)
        {
            return Err(MapError::InvalidDefinition(format!(
                "tile row {y} has {} cells, expected {}",
                row.len(),
                def.width
            )));
        }

        let width = def.width as usize;
        let height = def.height as usize;
        check_border_shape("horizontal", &def.horizontal_borders, height.saturating_sub(1), width)?;
        check_border_shape("vertical", &def.vertical_borders, height, width.saturating_sub(1))?;

        let cell = |rows: &[Vec<Border>], x: usize, y: usize| {
            rows.get(y)
                .and_then(|row| row.get(x))
                .copied()
                .unwrap_or(Border::NONE)
        };

        let mut horizontal = Vec::with_capacity(height.saturating_sub(1) * width);
        for y in 0..height.saturating_sub(1) {
            for x in 0..width {
                horizontal.push(cell(&def.horizontal_borders, x, y));
            }
        }

        let mut vertical = Vec::with_capacity(height * width.saturating_sub(1));
        for y in 0..height {
            for x in 0..width.saturating_sub(1) {
                vertical.push(cell(&def.vertical_borders, x, y));
            }
        }

        let mut map = Self {
            name: def.name.clone(),
            width: def.width,
            height: def.height,
            tiles: def.tiles.iter().flatten().copied().collect(),
            horizontal,
            vertical,
            occupancy: BTreeMap::new(),
            spawn_point: None,
            sounds: Vec::new(),
        };
        map.spawn_point = map.pick_spawn_point(rng);
        Ok(map)
    }

    fn pick_spawn_point(&self, rng: &mut GameRng) -> Option<Position> {
        let candidates: Vec<Position> = self
            .positions()
            .filter(|pos| self.tile_at(*pos).walkable && self.occupant_count(*pos) == 0)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let index = rng.index(0, RollContext::Setup, candidates.len());
        Some(candidates[index])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn spawn_point(&self) -> Option<Position> {
        self.spawn_point
    }

    /// Moves the spawn point. Returns false and keeps the old one when
    /// `spawn` is not a walkable in-bounds cell.
    pub fn set_spawn_point(&mut self, spawn: Option<Position>) -> bool {
        if let Some(pos) = spawn
            && !(self.in_bounds(pos) && self.tile_at(pos).walkable)
        {
            return false;
        }
        self.spawn_point = spawn;
        true
    }

    /// Current tiles and borders as a definition with no entities.
    pub fn to_definition(&self) -> MapDefinition {
        let width = self.width as usize;
        let rows = |edges: &[Border], len: usize| -> Vec<Vec<Border>> {
            if len == 0 {
                return Vec::new();
            }
            edges.chunks(len).map(<[Border]>::to_vec).collect()
        };
        MapDefinition {
            name: self.name.clone(),
            width: self.width,
            height: self.height,
            tiles: self.tiles.chunks(width).map(<[Tile]>::to_vec).collect(),
            horizontal_borders: rows(self.horizontal.as_slice(), width),
            vertical_borders: rows(self.vertical.as_slice(), width.saturating_sub(1)),
            entities: Vec::new(),
        }
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Every cell in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| Position::new(x, y)))
    }

    fn tile_index(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// Out-of-bounds lookups return a non-walkable wall.
    pub fn tile_at(&self, pos: Position) -> Tile {
        self.tile_index(pos)
            .map(|index| self.tiles[index])
            .unwrap_or(Tile::OUT_OF_BOUNDS)
    }

    /// Explicit map edit.
    pub fn set_tile(&mut self, pos: Position, tile: Tile) -> Result<(), MapError> {
        let index = self
            .tile_index(pos)
            .ok_or(MapError::OutOfBounds { position: pos })?;
        self.tiles[index] = tile;
        Ok(())
    }

    fn border_index(&self, pos: Position, direction: Direction) -> Option<(bool, usize)> {
        if !self.in_bounds(pos) {
            return None;
        }
        let (x, y) = (pos.x as usize, pos.y as usize);
        let (w, h) = (self.width as usize, self.height as usize);
        match direction {
            Direction::North if y > 0 => Some((true, (y - 1) * w + x)),
            Direction::South if y + 1 < h => Some((true, y * w + x)),
            Direction::East if x + 1 < w => Some((false, y * (w - 1) + x)),
            Direction::West if x > 0 => Some((false, y * (w - 1) + x - 1)),
            _ => None,
        }
    }

    /// Edge on the given side of a cell. Map edges read as [`Border::NONE`].
    pub fn border_at(&self, pos: Position, direction: Direction) -> Border {
        match self.border_index(pos, direction) {
            Some((true, index)) => self.horizontal[index],
            Some((false, index)) => self.vertical[index],
            None => Border::NONE,
        }
    }

    fn border_mut(&mut self, pos: Position, direction: Direction) -> Option<&mut Border> {
        match self.border_index(pos, direction)? {
            (true, index) => self.horizontal.get_mut(index),
            (false, index) => self.vertical.get_mut(index),
        }
    }

    /// Replaces an edge. Returns false for edges outside the map.
    pub fn set_border(&mut self, pos: Position, direction: Direction, border: Border) -> bool {
        match self.border_mut(pos, direction) {
            Some(slot) => {
                *slot = border;
                true
            }
            None => false,
        }
    }

    /// True when `to` is an in-bounds cardinal neighbour of `from` and the
    /// edge between them is open. Tile walkability is not considered.
    pub fn can_traverse(&self, from: Position, to: Position) -> bool {
        let Some(direction) = from.direction_to(to) else {
            return false;
        };
        if !self.in_bounds(from) || !self.in_bounds(to) {
            return false;
        }
        !self.border_at(from, direction).blocks()
    }

    /// In-bounds cardinal neighbours reachable through open edges, in
    /// west, east, north, south order.
    pub fn neighbors(&self, pos: Position) -> ArrayVec<Position, 4> {
        [
            Direction::West,
            Direction::East,
            Direction::North,
            Direction::South,
        ]
        .into_iter()
        .map(|direction| pos.step(direction))
        .filter(|next| self.can_traverse(pos, *next))
        .collect()
    }

    /// Flips a door edge and returns its new open state. `None` for non-doors.
    pub fn toggle_door(&mut self, pos: Position, direction: Direction) -> Option<bool> {
        let border = self.border_mut(pos, direction)?;
        if !border.is_door() {
            return None;
        }
        border.open = !border.open;
        Some(border.open)
    }

    /// Turns a door edge into an empty edge. Returns whether a door was removed;
    /// walls and empty edges are left untouched.
    pub fn destroy_door(&mut self, pos: Position, direction: Direction) -> bool {
        match self.border_mut(pos, direction) {
            Some(border) if border.is_door() => {
                *border = Border::NONE;
                true
            }
            _ => false,
        }
    }

    /// First door edge around a cell in north, south, east, west order.
    pub fn find_adjacent_door(&self, pos: Position) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| self.border_at(pos, *direction).is_door())
    }

    // ===== occupancy =====

    pub fn occupants(&self, pos: Position) -> &[EntityId] {
        self.occupancy
            .get(&pos)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    pub fn occupant_count(&self, pos: Position) -> usize {
        self.occupants(pos).len()
    }

    pub fn has_room(&self, pos: Position) -> bool {
        self.occupant_count(pos) < GameConfig::MAX_OCCUPANTS_PER_TILE
    }

    /// Walkable tile with room for one more occupant.
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.tile_at(pos).walkable && self.has_room(pos)
    }

    fn check_enterable(&self, pos: Position) -> Result<(), MapError> {
        if !self.in_bounds(pos) {
            return Err(MapError::OutOfBounds { position: pos });
        }
        if !self.tile_at(pos).walkable {
            return Err(MapError::NotWalkable { position: pos });
        }
        if !self.has_room(pos) {
            return Err(MapError::CellFull { position: pos });
        }
        Ok(())
    }

    pub fn place(&mut self, entity: EntityId, pos: Position) -> Result<(), MapError> {
        self.check_enterable(pos)?;
        let cell = self.occupancy.entry(pos).or_default();
        if !cell.contains(&entity) {
            cell.push(entity);
        }
        Ok(())
    }

    pub fn remove(&mut self, entity: EntityId, pos: Position) -> bool {
        let Some(cell) = self.occupancy.get_mut(&pos) else {
            return false;
        };
        let Some(index) = cell.iter().position(|id| *id == entity) else {
            return false;
        };
        cell.remove(index);
        if cell.is_empty() {
            self.occupancy.remove(&pos);
        }
        true
    }

    /// Moves an occupant. The destination is validated before the source is
    /// touched, so a failed move leaves the index unchanged.
    pub fn relocate(&mut self, entity: EntityId, from: Position, to: Position) -> Result<(), MapError> {
        if !self.occupants(from).contains(&entity) {
            return Err(MapError::NotOccupant {
                entity,
                position: from,
            });
        }
        self.check_enterable(to)?;
        self.remove(entity, from);
        self.place(entity, to)
    }

    // ===== sound =====

    pub fn add_sound(&mut self, position: Position, intensity: u32, source: SoundSource, duration: u32) {
        self.sounds.push(SoundEvent {
            position,
            intensity,
            source,
            remaining: duration,
        });
    }

    pub fn sounds(&self) -> &[SoundEvent] {
        &self.sounds
    }

    /// Ages every sound by one round and drops the ones that faded.
    pub fn tick_sounds(&mut self) {
        for sound in &mut self.sounds {
            sound.remaining = sound.remaining.saturating_sub(1);
        }
        self.sounds.retain(SoundEvent::is_audible);
    }

    /// Replaces the active sounds, keeping only audible in-bounds ones.
    pub fn replace_sounds(&mut self, sounds: Vec<SoundEvent>) {
        self.sounds = sounds
            .into_iter()
            .filter(|sound| sound.is_audible() && self.in_bounds(sound.position))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileKind;
    use proptest::prelude::*;

    fn open_map(width: u32, height: u32) -> GridMap {
        GridMap::from_definition(&MapDefinition::open("test", width, height), &mut GameRng::new(1))
            .expect("valid map")
    }

    #[test]
    fn tile_outside_map_is_wall() {
        let map = open_map(3, 3);
        let tile = map.tile_at(Position::new(-1, 0));
        assert_eq!(tile.kind, TileKind::Wall);
        assert!(!tile.walkable);
    }

    #[test]
    fn border_lookup_is_shared_by_both_sides() {
        let mut map = open_map(3, 3);
        let a = Position::new(1, 1);
        assert!(map.set_border(a, Direction::South, Border::WALL));
        assert_eq!(map.border_at(Position::new(1, 2), Direction::North), Border::WALL);

        assert!(map.set_border(a, Direction::West, Border::door(false)));
        assert!(map.border_at(Position::new(0, 1), Direction::East).is_door());
    }

    #[test]
    fn map_edges_have_no_border() {
        let map = open_map(2, 2);
        assert_eq!(map.border_at(Position::new(0, 0), Direction::North), Border::NONE);
        assert_eq!(map.border_at(Position::new(1, 1), Direction::East), Border::NONE);
    }

    #[test]
    fn closed_door_blocks_until_toggled() {
        let mut map = open_map(3, 1);
        let a = Position::new(0, 0);
        let b = Position::new(1, 0);
        map.set_border(a, Direction::East, Border::door(false));
        assert!(!map.can_traverse(a, b));
        assert_eq!(map.toggle_door(a, Direction::East), Some(true));
        assert!(map.can_traverse(b, a));
    }

    #[test]
    fn toggle_ignores_walls() {
        let mut map = open_map(3, 1);
        let a = Position::new(0, 0);
        map.set_border(a, Direction::East, Border::WALL);
        assert_eq!(map.toggle_door(a, Direction::East), None);
        assert!(!map.destroy_door(a, Direction::East));
        assert_eq!(map.border_at(a, Direction::East), Border::WALL);
    }

    #[test]
    fn diagonal_is_never_traversable() {
        let map = open_map(3, 3);
        assert!(!map.can_traverse(Position::new(0, 0), Position::new(1, 1)));
    }

    #[test]
    fn neighbors_respect_borders_and_bounds() {
        let mut map = open_map(3, 3);
        let corner = Position::new(0, 0);
        map.set_border(corner, Direction::East, Border::WALL);
        let neighbors = map.neighbors(corner);
        assert_eq!(neighbors.as_slice(), &[Position::new(0, 1)]);
    }

    #[test]
    fn cell_capacity_is_capped() {
        let mut map = open_map(1, 1);
        let cell = Position::new(0, 0);
        for id in 0..GameConfig::MAX_OCCUPANTS_PER_TILE as u32 {
            map.place(EntityId(id), cell).expect("room left");
        }
        assert!(!map.is_walkable(cell));
        assert_eq!(
            map.place(EntityId(99), cell),
            Err(MapError::CellFull { position: cell })
        );
    }

    #[test]
    fn failed_relocate_leaves_index_untouched() {
        let mut map = open_map(2, 1);
        let from = Position::new(0, 0);
        let to = Position::new(1, 0);
        map.set_tile(to, Tile::WALL).expect("in bounds");
        map.place(EntityId(1), from).expect("placed");

        let err = map.relocate(EntityId(1), from, to).unwrap_err();
        assert_eq!(err.error_code(), "MAP_NOT_WALKABLE");
        assert_eq!(map.occupants(from), &[EntityId(1)]);
        assert!(map.occupants(to).is_empty());
    }

    #[test]
    fn spawn_point_is_walkable() {
        let def = MapDefinition::walled("ring", 5, 5);
        let map = GridMap::from_definition(&def, &mut GameRng::new(11)).expect("valid map");
        let spawn = map.spawn_point().expect("interior floor exists");
        assert!(map.tile_at(spawn).walkable);
    }

    #[test]
    fn rejects_ragged_rows() {
        let mut def = MapDefinition::open("bad", 3, 2);
        def.tiles[1].pop();
        let err = GridMap::from_definition(&def, &mut GameRng::new(1)).unwrap_err();
        assert!(matches!(err, MapError::InvalidDefinition(_)));
    }

    #[test]
    fn rejects_oversized_border_arrays() {
        let mut def = MapDefinition::open("bad", 3, 2);
        def.horizontal_borders = vec![vec![Border::NONE; 3]; 2];
        let err = GridMap::from_definition(&def, &mut GameRng::new(1)).unwrap_err();
        assert!(matches!(err, MapError::InvalidDefinition(_)));

        let mut def = MapDefinition::open("bad", 3, 2);
        def.vertical_borders = vec![vec![Border::NONE; 2], vec![Border::WALL; 3]];
        let err = GridMap::from_definition(&def, &mut GameRng::new(1)).unwrap_err();
        assert!(matches!(err, MapError::InvalidDefinition(_)));
    }

    #[test]
    fn short_border_arrays_default_to_none() {
        let mut def = MapDefinition::open("sparse", 3, 3);
        def.vertical_borders = vec![vec![Border::WALL]];
        let map = GridMap::from_definition(&def, &mut GameRng::new(1)).expect("valid map");
        assert_eq!(map.border_at(Position::new(0, 0), Direction::East), Border::WALL);
        assert_eq!(map.border_at(Position::new(1, 2), Direction::East), Border::NONE);
    }

    fn border_of(kind: u8) -> Border {
        match kind {
            0 => Border::NONE,
            1 => Border::WALL,
            2 => Border::door(false),
            _ => Border::door(true),
        }
    }

    proptest! {
        #[test]
        fn traversal_is_symmetric(
            x in 0i32..5, y in 0i32..5, side in 0usize..4, kind in 0u8..4
        ) {
            let mut map = open_map(5, 5);
            let a = Position::new(x, y);
            let direction = Direction::ALL[side];
            let b = a.step(direction);
            let border = border_of(kind);
            let placed = map.set_border(a, direction, border);

            prop_assert_eq!(map.can_traverse(a, b), map.can_traverse(b, a));
            if placed && border.blocks() {
                prop_assert!(!map.can_traverse(a, b));
            }
        }

        #[test]
        fn destroyed_doors_stay_open_both_ways(
            x in 0i32..4, y in 0i32..5, open in any::<bool>()
        ) {
            let mut map = open_map(5, 5);
            let a = Position::new(x, y);
            let b = a.step(Direction::East);
            prop_assert!(map.set_border(a, Direction::East, Border::door(open)));

            prop_assert!(map.destroy_door(a, Direction::East));
            prop_assert!(!map.destroy_door(b, Direction::West));
            prop_assert_eq!(map.border_at(a, Direction::East), Border::NONE);
            prop_assert!(map.can_traverse(a, b));
            prop_assert!(map.can_traverse(b, a));
        }
    }

    #[test]
    fn definition_round_trips_edits() {
        let mut map = open_map(4, 3);
        map.set_tile(Position::new(3, 2), Tile::WALL).expect("in bounds");
        map.set_border(Position::new(1, 1), Direction::East, Border::door(true));
        map.set_border(Position::new(2, 0), Direction::South, Border::WALL);

        let def = map.to_definition();
        assert_eq!(def.vertical_borders.len(), 3);
        assert_eq!(def.horizontal_borders.len(), 2);
        let rebuilt = GridMap::from_definition(&def, &mut GameRng::new(5)).expect("valid map");
        assert_eq!(rebuilt.tile_at(Position::new(3, 2)), Tile::WALL);
        assert_eq!(rebuilt.border_at(Position::new(2, 1), Direction::West), Border::door(true));
        assert_eq!(rebuilt.border_at(Position::new(2, 1), Direction::North), Border::WALL);
    }

    #[test]
    fn spawn_point_must_be_walkable() {
        let mut map = open_map(3, 1);
        map.set_tile(Position::new(2, 0), Tile::WALL).expect("in bounds");
        assert!(!map.set_spawn_point(Some(Position::new(2, 0))));
        assert!(!map.set_spawn_point(Some(Position::new(5, 0))));
        assert!(map.set_spawn_point(Some(Position::new(1, 0))));
        assert_eq!(map.spawn_point(), Some(Position::new(1, 0)));
    }

    #[test]
    fn sounds_fade_after_their_duration() {
        let mut map = open_map(2, 2);
        map.add_sound(Position::ORIGIN, 2, SoundSource::DoorBash, 3);
        map.tick_sounds();
        map.tick_sounds();
        assert_eq!(map.sounds().len(), 1);
        assert_eq!(map.sounds()[0].remaining, 1);
        map.tick_sounds();
        assert!(map.sounds().is_empty());
    }
}
