//! Map data loader.
//!
//! Map files draw the terrain as text rows and list borders sparsely, one
//! entry per edge, named by a cell and the side of it the edge lies on:
//!
//! ```text
//! (
//!     name: "crypt",
//!     rows: [
//!         "#####",
//!         "#..>#",
//!         "#####",
//!     ],
//!     borders: [(x: 1, y: 1, side: east, kind: door)],
//!     entities: [(monster: "goblin", x: 3, y: 1)],
//! )
//! ```

use std::path::Path;

use anyhow::{Context, bail, ensure};
use game_core::{
    Border, BorderKind, Direction, EntitySpec, MapDefinition, Position, Tile, TileKind,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// On-disk map layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapFile {
    pub name: String,
    /// `rows[y]`, one character per cell. See [`tile_for`] for the legend.
    pub rows: Vec<String>,
    #[serde(default)]
    pub borders: Vec<BorderSpec>,
    #[serde(default)]
    pub entities: Vec<EntityPlacement>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BorderSpec {
    pub x: i32,
    pub y: i32,
    pub side: Direction,
    pub kind: BorderKind,
    #[serde(default)]
    pub open: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityPlacement {
    pub monster: String,
    pub x: i32,
    pub y: i32,
}

/// Tile legend for map rows.
pub fn tile_for(symbol: char) -> Option<Tile> {
    let kind = match symbol {
        '.' => TileKind::Floor,
        '#' => TileKind::Wall,
        '+' => TileKind::Door,
        '>' => TileKind::Stairs,
        '~' => TileKind::Water,
        '^' => TileKind::Lava,
        _ => return None,
    };
    Some(Tile::of_kind(kind))
}

/// Which border array holds an edge, and where. `true` selects the
/// horizontal array.
fn border_slot(side: Direction, x: usize, y: usize, width: usize, height: usize) -> Option<(bool, usize, usize)> {
    match side {
        Direction::North if y > 0 => Some((true, y - 1, x)),
        Direction::South if y + 1 < height => Some((true, y, x)),
        Direction::East if x + 1 < width => Some((false, y, x)),
        Direction::West if x > 0 => Some((false, y, x - 1)),
        _ => None,
    }
}

impl MapFile {
    /// Converts the file into the record the engine builds a level from.
    pub fn into_definition(self) -> LoadResult<MapDefinition> {
        let height = self.rows.len();
        ensure!(height > 0, "map '{}' has no rows", self.name);
        let width = self.rows[0].chars().count();
        ensure!(width > 0, "map '{}' has an empty first row", self.name);

        let mut tiles = Vec::with_capacity(height);
        for (y, row) in self.rows.iter().enumerate() {
            let cells: Vec<Tile> = row
                .chars()
                .enumerate()
                .map(|(x, symbol)| {
                    tile_for(symbol)
                        .with_context(|| format!("unknown tile '{symbol}' at ({x}, {y})"))
                })
                .collect::<LoadResult<_>>()?;
            ensure!(
                cells.len() == width,
                "row {y} has {} cells, expected {width}",
                cells.len()
            );
            tiles.push(cells);
        }

        let mut horizontal = vec![vec![Border::NONE; width]; height.saturating_sub(1)];
        let mut vertical = vec![vec![Border::NONE; width.saturating_sub(1)]; height];
        for spec in &self.borders {
            let (x, y) = match (usize::try_from(spec.x), usize::try_from(spec.y)) {
                (Ok(x), Ok(y)) if x < width && y < height => (x, y),
                _ => bail!("border at ({}, {}) is outside the map", spec.x, spec.y),
            };
            let Some((is_horizontal, row, col)) = border_slot(spec.side, x, y, width, height) else {
                bail!("{} border of ({x}, {y}) lies on the map edge", spec.side);
            };
            let border = Border {
                kind: spec.kind,
                open: spec.open,
            };
            if is_horizontal {
                horizontal[row][col] = border;
            } else {
                vertical[row][col] = border;
            }
        }

        let entities = self
            .entities
            .into_iter()
            .map(|placement| EntitySpec {
                monster: placement.monster,
                position: Position::new(placement.x, placement.y),
            })
            .collect();

        Ok(MapDefinition {
            name: self.name,
            width: width as u32,
            height: height as u32,
            tiles,
            horizontal_borders: horizontal,
            vertical_borders: vertical,
            entities,
        })
    }
}

/// Loader for map data from RON files.
pub struct MapLoader;

impl MapLoader {
    pub fn load(path: &Path) -> LoadResult<MapDefinition> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("Failed to load map {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<MapDefinition> {
        let file: MapFile = ron::from_str(content)?;
        file.into_definition()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{GameRng, GridMap};

    const CRYPT: &str = r######"(
        name: "crypt",
        rows: [
            "#####",
            "#.~.#",
            "#..>#",
            "#####",
        ],
        borders: [
            (x: 1, y: 1, side: east, kind: door),
            (x: 2, y: 2, side: north, kind: wall),
            (x: 3, y: 1, side: south, kind: door, open: true),
        ],
        entities: [(monster: "goblin", x: 1, y: 2)],
    )"######;

    #[test]
    fn rows_and_sparse_borders_become_a_definition() {
        let def = MapLoader::parse(CRYPT).expect("valid map");
        assert_eq!((def.width, def.height), (5, 4));
        assert_eq!(def.tiles[1][2].kind, TileKind::Water);
        assert!(!def.tiles[1][2].walkable);
        assert_eq!(def.tiles[2][3].kind, TileKind::Stairs);

        assert_eq!(def.vertical_borders[1][1], Border::door(false));
        assert_eq!(def.horizontal_borders[1][2], Border::WALL);
        assert_eq!(def.horizontal_borders[1][3], Border::door(true));
        assert_eq!(def.entities[0].position, Position::new(1, 2));
    }

    #[test]
    fn borders_read_the_same_from_both_cells() {
        let def = MapLoader::parse(CRYPT).expect("valid map");
        let map = GridMap::from_definition(&def, &mut GameRng::new(1)).expect("consistent");

        assert!(map.border_at(Position::new(1, 1), Direction::East).is_door());
        assert!(map.border_at(Position::new(2, 1), Direction::West).is_door());
        assert_eq!(map.border_at(Position::new(2, 1), Direction::South), Border::WALL);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = MapLoader::parse(r####"(name: "bad", rows: ["###", "##"])"####).expect_err("ragged");
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn unknown_symbols_are_rejected() {
        assert!(MapLoader::parse(r####"(name: "bad", rows: ["#?#"])"####).is_err());
    }

    #[test]
    fn edge_borders_are_rejected() {
        let map = r#"(
            name: "edge",
            rows: ["..", ".."],
            borders: [(x: 0, y: 0, side: north, kind: wall)],
        )"#;
        let err = MapLoader::parse(map).expect_err("outer edge");
        assert!(err.to_string().contains("map edge"));
    }
}
