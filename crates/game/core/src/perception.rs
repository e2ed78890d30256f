//! Vision and hearing used by enemies to acquire targets.
//!
//! Vision always wins: sound is only consulted when no character is visible
//! on the current decision tick.
use crate::grid::{GridMap, SoundEvent};
use crate::state::{EntityId, Position};
use crate::world::World;

/// What an observer noticed this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Detection {
    Seen { target: EntityId, position: Position },
    Heard { position: Position },
    Nothing,
}

/// Vision range after the target's stealth is taken off. Never below 1.
pub fn effective_vision(base_range: u32, stealth: u32) -> u32 {
    base_range.saturating_sub(stealth).max(1)
}

/// Bresenham line from `from` to `to`.
///
/// Every cell strictly between the endpoints must be walkable, and every
/// cell-to-cell crossing must pass an open edge. A diagonal step is clear
/// when at least one of its two orthogonal detours is clear.
pub fn line_of_sight(map: &GridMap, from: Position, to: Position) -> bool {
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx - dy;
    let mut current = from;

    while current != to {
        let mut next = current;
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            next.x += sx;
        }
        if e2 < dx {
            err += dx;
            next.y += sy;
        }

        if !crossing_is_clear(map, current, next) {
            return false;
        }
        if next != to && !map.tile_at(next).walkable {
            return false;
        }
        current = next;
    }

    true
}

fn crossing_is_clear(map: &GridMap, from: Position, to: Position) -> bool {
    if from.x == to.x || from.y == to.y {
        return map.can_traverse(from, to);
    }
    let via = |corner: Position| {
        map.tile_at(corner).walkable && map.can_traverse(from, corner) && map.can_traverse(corner, to)
    };
    via(Position::new(to.x, from.y)) || via(Position::new(from.x, to.y))
}

pub fn can_see(
    map: &GridMap,
    observer: Position,
    vision_range: u32,
    target: Position,
    target_stealth: u32,
) -> bool {
    observer.manhattan(target) <= effective_vision(vision_range, target_stealth)
        && line_of_sight(map, observer, target)
}

/// First living character (in id order) the observer can see.
pub fn scan_vision(world: &World, observer: Position, vision_range: u32) -> Option<(EntityId, Position)> {
    world.living_characters().find_map(|character| {
        let position = character.position?;
        can_see(
            world.map(),
            observer,
            vision_range,
            position,
            character.stealth_level(),
        )
        .then_some((character.id, position))
    })
}

/// Closest audible sound within range; the earliest emitted wins ties.
pub fn closest_sound(map: &GridMap, observer: Position, sound_range: u32) -> Option<SoundEvent> {
    map.sounds()
        .iter()
        .filter(|sound| sound.is_audible() && observer.manhattan(sound.position) <= sound_range)
        .min_by_key(|sound| observer.manhattan(sound.position))
        .copied()
}

/// Runs vision, then hearing, for an observer standing at `observer`.
pub fn perceive(world: &World, observer: Position, vision_range: u32, sound_range: u32) -> Detection {
    if let Some((target, position)) = scan_vision(world, observer, vision_range) {
        return Detection::Seen { target, position };
    }
    match closest_sound(world.map(), observer, sound_range) {
        Some(sound) => Detection::Heard {
            position: sound.position,
        },
        None => Detection::Nothing,
    }
}
