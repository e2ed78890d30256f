//! Grid A* over border-gated cardinal adjacency.
//!
//! Step cost is uniform, the heuristic is Manhattan distance, and ties on f
//! are broken by insertion order so the same query always yields the same path.
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use crate::grid::GridMap;
use crate::state::Position;

/// Shortest path from `start` to `goal`, both ends included.
///
/// Cells entered along the way must be walkable tiles; occupancy is ignored.
/// Returns `None` when the goal is unreachable.
pub fn find_path(map: &GridMap, start: Position, goal: Position) -> Option<Vec<Position>> {
    if !map.in_bounds(start) || !map.in_bounds(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    // (f, insertion sequence) under Reverse makes the max-heap pop the lowest f,
    // earliest enqueued first.
    let mut open: BinaryHeap<(Reverse<u32>, Reverse<u64>, Position)> = BinaryHeap::new();
    let mut g_score: BTreeMap<Position, u32> = BTreeMap::new();
    let mut came_from: BTreeMap<Position, Position> = BTreeMap::new();
    let mut closed: BTreeSet<Position> = BTreeSet::new();
    let mut sequence = 0u64;

    g_score.insert(start, 0);
    open.push((Reverse(start.manhattan(goal)), Reverse(sequence), start));

    while let Some((_, _, current)) = open.pop() {
        if current == goal {
            return Some(reconstruct(&came_from, current));
        }
        if !closed.insert(current) {
            continue;
        }
        let current_g = g_score.get(&current).copied().unwrap_or(u32::MAX);

        for next in map.neighbors(current) {
            if closed.contains(&next) || !map.tile_at(next).walkable {
                continue;
            }
            let tentative = current_g + 1;
            if tentative < g_score.get(&next).copied().unwrap_or(u32::MAX) {
                g_score.insert(next, tentative);
                came_from.insert(next, current);
                sequence += 1;
                open.push((
                    Reverse(tentative + next.manhattan(goal)),
                    Reverse(sequence),
                    next,
                ));
            }
        }
    }

    None
}

/// First cell to move into when heading for `goal`, if a path exists.
pub fn next_step(map: &GridMap, start: Position, goal: Position) -> Option<Position> {
    find_path(map, start, goal)?.get(1).copied()
}

fn reconstruct(came_from: &BTreeMap<Position, Position>, mut current: Position) -> Vec<Position> {
    let mut path = vec![current];
    while let Some(previous) = came_from.get(&current) {
        current = *previous;
        path.push(current);
    }
    path.reverse();
    path
}
