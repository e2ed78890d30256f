/// Kind of edge between two adjacent cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BorderKind {
    #[default]
    None,
    Wall,
    Door,
}

/// Directional edge record. `open` only carries meaning for doors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Border {
    pub kind: BorderKind,
    pub open: bool,
}

impl Border {
    pub const NONE: Border = Border {
        kind: BorderKind::None,
        open: false,
    };

    pub const WALL: Border = Border {
        kind: BorderKind::Wall,
        open: false,
    };

    pub const fn door(open: bool) -> Self {
        Self {
            kind: BorderKind::Door,
            open,
        }
    }

    pub const fn is_door(&self) -> bool {
        matches!(self.kind, BorderKind::Door)
    }

    /// Walls always block; doors block while closed.
    pub const fn blocks(&self) -> bool {
        match self.kind {
            BorderKind::None => false,
            BorderKind::Wall => true,
            BorderKind::Door => !self.open,
        }
    }
}
