/// Terrain of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum TileKind {
    Floor,
    Wall,
    Door,
    Stairs,
    Water,
    Lava,
}

impl TileKind {
    /// Walkability a freshly generated tile of this kind gets.
    pub const fn walkable_by_default(self) -> bool {
        matches!(self, TileKind::Floor | TileKind::Door | TileKind::Stairs)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub kind: TileKind,
    pub walkable: bool,
}

impl Tile {
    /// Returned for every lookup outside the map.
    pub const OUT_OF_BOUNDS: Tile = Tile {
        kind: TileKind::Wall,
        walkable: false,
    };

    pub const FLOOR: Tile = Tile::of_kind(TileKind::Floor);
    pub const WALL: Tile = Tile::of_kind(TileKind::Wall);

    pub const fn of_kind(kind: TileKind) -> Self {
        Self {
            kind,
            walkable: kind.walkable_by_default(),
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::FLOOR
    }
}
