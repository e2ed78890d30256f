use crate::stats::Skill;
use crate::state::Position;

/// What produced a sound event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SoundSource {
    DoorBash,
    Skill(Skill),
}

/// Timed stimulus that enemies can hear without seeing its origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoundEvent {
    pub position: Position,
    pub intensity: u32,
    pub source: SoundSource,
    /// Rounds left before the event fades. Zero means inaudible.
    pub remaining: u32,
}

impl SoundEvent {
    pub fn is_audible(&self) -> bool {
        self.remaining > 0
    }
}
