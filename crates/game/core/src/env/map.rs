use crate::grid::{Border, Tile};
use crate::state::Position;

/// Enemy placement listed by a map file.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntitySpec {
    /// Monster catalog key.
    pub monster: String,
    pub position: Position,
}

/// Static description of a dungeon level as produced by content loaders.
///
/// Border arrays may be shorter than the grid; missing edges read as
/// [`Border::NONE`]. `horizontal_borders[y][x]` is the edge between rows `y`
/// and `y + 1`, `vertical_borders[y][x]` the edge between columns `x` and `x + 1`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDefinition {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Row-major, `tiles[y][x]`.
    pub tiles: Vec<Vec<Tile>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub horizontal_borders: Vec<Vec<Border>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub vertical_borders: Vec<Vec<Border>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub entities: Vec<EntitySpec>,
}

impl MapDefinition {
    /// Floor-only map without borders or entities.
    pub fn open(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            tiles: vec![vec![Tile::FLOOR; width as usize]; height as usize],
            horizontal_borders: Vec::new(),
            vertical_borders: Vec::new(),
            entities: Vec::new(),
        }
    }

    /// Same as [`MapDefinition::open`] with a ring of wall tiles on the edge.
    pub fn walled(name: impl Into<String>, width: u32, height: u32) -> Self {
        let mut def = Self::open(name, width, height);
        for (y, row) in def.tiles.iter_mut().enumerate() {
            for (x, tile) in row.iter_mut().enumerate() {
                let edge = x == 0 || y == 0 || x + 1 == width as usize || y + 1 == height as usize;
                if edge {
                    *tile = Tile::WALL;
                }
            }
        }
        def
    }
}
