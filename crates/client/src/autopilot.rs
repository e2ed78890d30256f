//! Scripted party used to exercise a session without a player.
//!
//! Each group member picks up loot underfoot, attacks anything in reach and
//! otherwise walks toward the closest enemy until its action points run out.
use game_core::pathfinding::next_step;
use game_core::{Direction, Position};
use runtime::GameSession;

/// Plays one round. Returns `false` when the group has nobody left to act.
pub fn play_round(session: &mut GameSession) -> bool {
    let members = session.engine().party().group().len();
    let mut anyone_alive = false;
    for index in 0..members {
        if !session.switch_active(index).success {
            continue;
        }
        if session
            .engine()
            .active_member()
            .is_some_and(|member| member.is_alive())
        {
            anyone_alive = true;
            while take_action(session) {}
        }
    }

    if let game_core::TurnOutcome::ConfirmationRequired { remaining } = session.end_turn() {
        tracing::debug!(target: "dungeon::autopilot", remaining, "ending turn with points left");
        session.confirm_end_turn();
    }
    anyone_alive
}

/// One action for the active member. `false` when it should stop.
fn take_action(session: &mut GameSession) -> bool {
    let Some(member) = session.engine().active_member() else {
        return false;
    };
    let Some(from) = member.position.filter(|_| member.is_alive()) else {
        return false;
    };
    if member.action_points.current == 0 {
        return false;
    }

    if !session.engine().world().items_at(from).is_empty() && session.pick_up().success {
        return true;
    }
    let attack = session.attack_nearby();
    if attack.success {
        tracing::info!(target: "dungeon::autopilot", "{attack}");
        return true;
    }

    match step_toward_enemy(session, from) {
        Some(direction) => session.move_active(direction).success,
        None => false,
    }
}

fn step_toward_enemy(session: &GameSession, from: Position) -> Option<Direction> {
    let engine = session.engine();
    let goal = engine
        .world()
        .living_enemy_ids()
        .into_iter()
        .filter_map(|id| engine.combatant(id).and_then(|enemy| enemy.position))
        .min_by_key(|pos| pos.manhattan(from))?;
    if from.manhattan(goal) <= 1 {
        return None;
    }
    let step = next_step(engine.map(), from, goal)?;
    from.direction_to(step)
}
