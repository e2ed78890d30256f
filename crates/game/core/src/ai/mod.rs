//! Enemy decision machine.
//!
//! One call to [`run_tick`] is one decision tick: perceive, update the state,
//! then act on it. Every tick consumes exactly one action point, so the enemy
//! phase always terminates.
mod state;

pub use state::{Aggression, AiBehavior, AiState, AiTarget};

use crate::combat::AttackReport;
use crate::config::GameConfig;
use crate::context::RulesContext;
use crate::env::RollContext;
use crate::events::GameEvent;
use crate::pathfinding::next_step;
use crate::perception::{Detection, line_of_sight, perceive};
use crate::state::{Direction, EntityId, Position};
use crate::world::World;

/// Attack state to use against a target `distance` away, if any.
pub fn attack_state_for(distance: u32, attack_range: u32) -> Option<AiState> {
    if distance <= 1 {
        Some(AiState::MeleeAttack)
    } else if attack_range > 1 && distance <= attack_range {
        Some(AiState::RangedAttack)
    } else {
        None
    }
}

/// Read-only snapshot of the enemy taken at the start of a tick.
#[derive(Clone, Copy, Debug)]
struct Snapshot {
    id: EntityId,
    position: Position,
    state: AiState,
    behavior: AiBehavior,
    target: Option<AiTarget>,
    origin: Position,
    vision_range: u32,
    sound_range: u32,
    attack_range: u32,
    patrol_radius: u32,
}

impl Snapshot {
    fn of(world: &World, id: EntityId) -> Option<Self> {
        let combatant = world.get(id)?;
        let profile = combatant.enemy_profile()?;
        Some(Self {
            id,
            position: combatant.position?,
            state: profile.state,
            behavior: profile.behavior,
            target: profile.target,
            origin: profile.origin,
            vision_range: profile.vision_range,
            sound_range: profile.sound_range,
            attack_range: profile.attack_range,
            patrol_radius: profile.patrol_radius,
        })
    }
}

/// Runs one decision tick for `enemy`. Returns false when the enemy cannot act
/// (dead, off the map, out of action points).
pub fn run_tick(ctx: &mut RulesContext<'_>, enemy: EntityId) -> bool {
    let Some(combatant) = ctx.world.get_mut(enemy) else {
        return false;
    };
    if !combatant.is_alive() || combatant.action_points.is_empty() || combatant.position.is_none() {
        return false;
    }
    let ap_before = combatant.action_points.current;

    let Some(profile) = combatant.enemy_profile_mut() else {
        return false;
    };
    if profile.is_stunned() {
        profile.stun_ticks -= 1;
        combatant.spend_action_points(GameConfig::ACTION_COST);
        return true;
    }

    let Some(me) = Snapshot::of(ctx.world, enemy) else {
        return false;
    };
    let detection = perceive(ctx.world, me.position, me.vision_range, me.sound_range);
    decide(ctx, &me, detection);
    if let Some(me) = Snapshot::of(ctx.world, enemy) {
        act(ctx, &me);
    }

    if let Some(combatant) = ctx.world.get_mut(enemy)
        && combatant.action_points.current == ap_before
    {
        combatant.spend_action_points(GameConfig::ACTION_COST);
    }
    true
}

fn set_state(ctx: &mut RulesContext<'_>, enemy: EntityId, next: AiState) {
    let Some(profile) = ctx.world.get_mut(enemy).and_then(|c| c.enemy_profile_mut()) else {
        return;
    };
    let previous = profile.state;
    if previous == next {
        return;
    }
    profile.state = next;
    ctx.emit(GameEvent::AiStateChanged {
        enemy,
        from: previous,
        to: next,
    });
}

fn set_target(ctx: &mut RulesContext<'_>, enemy: EntityId, target: Option<AiTarget>) {
    if let Some(profile) = ctx.world.get_mut(enemy).and_then(|c| c.enemy_profile_mut()) {
        profile.target = target;
    }
}

fn lose_target(ctx: &mut RulesContext<'_>, enemy: EntityId, behavior: AiBehavior) {
    set_target(ctx, enemy, None);
    let resting = match behavior {
        AiBehavior::Guard => AiState::Guard,
        _ => AiState::Patrol,
    };
    set_state(ctx, enemy, resting);
}

/// Perception-driven transitions.
fn decide(ctx: &mut RulesContext<'_>, me: &Snapshot, detection: Detection) {
    match detection {
        Detection::Seen { target, position } => {
            if let Some(profile) = ctx.world.get_mut(me.id).and_then(|c| c.enemy_profile_mut()) {
                profile.target = Some(AiTarget::Combatant(target));
                profile.last_seen = Some(position);
            }
            let distance = me.position.manhattan(position);
            let next = attack_state_for(distance, me.attack_range).unwrap_or(AiState::Chase);
            set_state(ctx, me.id, next);
        }
        Detection::Heard { position } => {
            set_target(ctx, me.id, Some(AiTarget::Sound(position)));
            set_state(ctx, me.id, AiState::Investigate);
        }
        Detection::Nothing => {
            if me.target.is_some() {
                lose_target(ctx, me.id, me.behavior);
            }
        }
    }
}

fn act(ctx: &mut RulesContext<'_>, me: &Snapshot) {
    match me.state {
        AiState::Idle => idle(ctx, me),
        AiState::Patrol => patrol(ctx, me),
        AiState::Chase => chase(ctx, me),
        AiState::Investigate => investigate(ctx, me),
        AiState::MeleeAttack | AiState::RangedAttack => attack(ctx, me),
        AiState::Guard => guard(ctx, me),
    }
}

fn idle(ctx: &mut RulesContext<'_>, me: &Snapshot) {
    let chance = ctx.config.idle_to_patrol_percent;
    if ctx.rng.chance(me.id.0, RollContext::Wander, chance) {
        set_state(ctx, me.id, AiState::Patrol);
    }
}

fn patrol(ctx: &mut RulesContext<'_>, me: &Snapshot) {
    if me.position.manhattan(me.origin) > me.patrol_radius {
        advance_toward(ctx, me, me.origin);
        return;
    }
    let index = ctx.rng.index(me.id.0, RollContext::Wander, Direction::ALL.len());
    let next = me.position.step(Direction::ALL[index]);
    if next.manhattan(me.origin) <= me.patrol_radius && ctx.world.can_step(me.position, next) {
        move_enemy(ctx, me.id, next);
    }
}

fn guard(ctx: &mut RulesContext<'_>, me: &Snapshot) {
    if me.position.manhattan(me.origin) > 1 {
        advance_toward(ctx, me, me.origin);
    } else {
        set_state(ctx, me.id, AiState::Idle);
    }
}

/// Living, placed position of the combatant an enemy is after.
fn target_position(ctx: &RulesContext<'_>, target: EntityId) -> Option<Position> {
    ctx.world
        .get(target)
        .filter(|c| c.is_alive())
        .and_then(|c| c.position)
}

fn chase(ctx: &mut RulesContext<'_>, me: &Snapshot) {
    let Some(AiTarget::Combatant(target)) = me.target else {
        lose_target(ctx, me.id, me.behavior);
        return;
    };
    let Some(goal) = target_position(ctx, target) else {
        lose_target(ctx, me.id, me.behavior);
        return;
    };
    if let Some(state) = attack_state_for(me.position.manhattan(goal), me.attack_range) {
        set_state(ctx, me.id, state);
        return;
    }
    if let Some(now) = advance_toward(ctx, me, goal)
        && let Some(state) = attack_state_for(now.manhattan(goal), me.attack_range)
    {
        set_state(ctx, me.id, state);
    }
}

fn investigate(ctx: &mut RulesContext<'_>, me: &Snapshot) {
    let Some(AiTarget::Sound(source)) = me.target else {
        lose_target(ctx, me.id, me.behavior);
        return;
    };
    if me.position.manhattan(source) <= 1 {
        set_target(ctx, me.id, None);
        set_state(ctx, me.id, AiState::Patrol);
        return;
    }
    advance_toward(ctx, me, source);
}

fn attack(ctx: &mut RulesContext<'_>, me: &Snapshot) {
    let target = match me.target {
        Some(AiTarget::Combatant(target)) => target,
        Some(AiTarget::Sound(_)) => {
            set_state(ctx, me.id, AiState::Investigate);
            return;
        }
        None => {
            lose_target(ctx, me.id, me.behavior);
            return;
        }
    };
    let Some(goal) = target_position(ctx, target) else {
        lose_target(ctx, me.id, me.behavior);
        return;
    };
    let distance = me.position.manhattan(goal);

    match me.state {
        AiState::RangedAttack => {
            if let Some(enemy) = ctx.world.get_mut(me.id) {
                enemy.spend_action_points(GameConfig::ACTION_COST);
            }
            let in_range = distance <= me.attack_range.max(1);
            if in_range && line_of_sight(ctx.world.map(), me.position, goal) {
                strike(ctx, me.id, target);
            } else {
                tracing::debug!(target: "game::ai", enemy = %me.id, distance, "ranged attack has no shot");
                ctx.emit(GameEvent::EnemyAttacked {
                    attacker: me.id,
                    target,
                    damage: 0,
                    landed: false,
                });
            }
        }
        _ => {
            if distance <= 1 {
                if let Some(enemy) = ctx.world.get_mut(me.id) {
                    enemy.spend_action_points(GameConfig::ACTION_COST);
                }
                strike(ctx, me.id, target);
            } else {
                set_state(ctx, me.id, AiState::Chase);
                chase(
                    ctx,
                    &Snapshot {
                        state: AiState::Chase,
                        ..*me
                    },
                );
            }
        }
    }
}

fn strike(ctx: &mut RulesContext<'_>, attacker: EntityId, target: EntityId) -> Option<AttackReport> {
    let report = ctx.attack(attacker, target)?;
    ctx.emit(GameEvent::EnemyAttacked {
        attacker,
        target,
        damage: report.damage,
        landed: true,
    });
    Some(report)
}

/// Takes one step toward `goal`, along the A* path when one exists and
/// greedily otherwise. Returns the new position if the enemy moved.
fn advance_toward(ctx: &mut RulesContext<'_>, me: &Snapshot, goal: Position) -> Option<Position> {
    let planned = next_step(ctx.world.map(), me.position, goal)
        .filter(|next| ctx.world.can_step(me.position, *next));
    let next = match planned {
        Some(next) => next,
        None => greedy_step(ctx, me.position, goal)?,
    };
    move_enemy(ctx, me.id, next)
}

/// Direct step that shrinks the larger axis gap first.
fn greedy_step(ctx: &RulesContext<'_>, from: Position, goal: Position) -> Option<Position> {
    let dx = goal.x - from.x;
    let dy = goal.y - from.y;
    let horizontal = (dx != 0).then(|| Position::new(from.x + dx.signum(), from.y));
    let vertical = (dy != 0).then(|| Position::new(from.x, from.y + dy.signum()));
    let ordered = if dx.abs() >= dy.abs() {
        [horizontal, vertical]
    } else {
        [vertical, horizontal]
    };
    ordered
        .into_iter()
        .flatten()
        .find(|next| ctx.world.can_step(from, *next))
}

fn move_enemy(ctx: &mut RulesContext<'_>, enemy: EntityId, to: Position) -> Option<Position> {
    match ctx.step(enemy, to) {
        Ok(from) => {
            ctx.emit(GameEvent::EnemyMoved {
                combatant: enemy,
                from,
                to,
            });
            Some(to)
        }
        Err(err) => {
            tracing::debug!(target: "game::ai", enemy = %enemy, error = %err, "enemy stays put");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::Combatant;
    use crate::env::{GameRng, MapDefinition, MonsterTemplate};
    use crate::grid::{GridMap, SoundSource};
    use crate::stats::Archetype;

    struct Arena {
        world: World,
        rng: GameRng,
        config: GameConfig,
        events: Vec<GameEvent>,
    }

    impl Arena {
        fn new(width: u32, height: u32) -> Self {
            let mut rng = GameRng::new(11);
            let map = GridMap::from_definition(&MapDefinition::open("ai", width, height), &mut rng)
                .expect("valid map");
            Self {
                world: World::new(map),
                rng,
                config: GameConfig::default(),
                events: Vec::new(),
            }
        }

        fn enemy(&mut self, template: &MonsterTemplate, at: Position) -> EntityId {
            let id = self.world.allocate_id();
            let enemy = Combatant::enemy(id, "Goblin", "goblin", template, at, &self.config);
            self.world.spawn(enemy, at).expect("spawned")
        }

        fn hero(&mut self, at: Position) -> EntityId {
            let id = self.world.allocate_id();
            let hero = Combatant::character(id, "Thorin", Archetype::Warrior);
            self.world.spawn(hero, at).expect("spawned")
        }

        fn tick(&mut self, enemy: EntityId) -> bool {
            let mut ctx = RulesContext {
                world: &mut self.world,
                rng: &mut self.rng,
                config: &self.config,
                events: &mut self.events,
            };
            run_tick(&mut ctx, enemy)
        }

        fn state(&self, enemy: EntityId) -> AiState {
            self.world
                .get(enemy)
                .and_then(|c| c.enemy_profile())
                .map(|p| p.state)
                .expect("enemy")
        }

        fn position(&self, id: EntityId) -> Option<Position> {
            self.world.get(id).and_then(|c| c.position)
        }

        fn action_points(&self, id: EntityId) -> u32 {
            self.world.get(id).map(|c| c.action_points.current).expect("exists")
        }
    }

    fn goblin() -> MonsterTemplate {
        MonsterTemplate::fallback("goblin")
    }

    #[test]
    fn attack_state_depends_on_distance_and_range() {
        assert_eq!(attack_state_for(1, 1), Some(AiState::MeleeAttack));
        assert_eq!(attack_state_for(2, 1), None);
        assert_eq!(attack_state_for(3, 4), Some(AiState::RangedAttack));
        assert_eq!(attack_state_for(5, 4), None);
    }

    #[test]
    fn sighted_enemy_chases_then_closes_to_melee() {
        let mut arena = Arena::new(6, 3);
        let enemy = arena.enemy(&goblin(), Position::new(0, 0));
        arena.hero(Position::new(2, 0));

        assert!(arena.tick(enemy));

        assert_eq!(arena.position(enemy), Some(Position::new(1, 0)));
        assert_eq!(arena.state(enemy), AiState::MeleeAttack);
        assert_eq!(arena.action_points(enemy), 2);
        assert!(arena.events.contains(&GameEvent::AiStateChanged {
            enemy,
            from: AiState::Idle,
            to: AiState::Chase,
        }));
    }

    #[test]
    fn adjacent_enemy_strikes() {
        let mut arena = Arena::new(4, 1);
        let enemy = arena.enemy(&goblin(), Position::new(0, 0));
        let hero = arena.hero(Position::new(1, 0));

        arena.tick(enemy);

        assert_eq!(arena.position(enemy), Some(Position::new(0, 0)));
        assert!(arena.events.iter().any(|event| matches!(
            event,
            GameEvent::EnemyAttacked { attacker, target, landed: true, .. }
                if *attacker == enemy && *target == hero
        )));
        assert_eq!(arena.action_points(enemy), 2);
    }

    #[test]
    fn ranged_enemy_shoots_without_closing_in() {
        let mut arena = Arena::new(6, 1);
        let mut archer = goblin();
        archer.stats.attack_range = 4;
        let enemy = arena.enemy(&archer, Position::new(0, 0));
        arena.hero(Position::new(3, 0));

        arena.tick(enemy);

        assert_eq!(arena.state(enemy), AiState::RangedAttack);
        assert_eq!(arena.position(enemy), Some(Position::new(0, 0)));
        assert!(
            arena
                .events
                .iter()
                .any(|event| matches!(event, GameEvent::EnemyAttacked { landed: true, .. }))
        );
    }

    #[test]
    fn stunned_enemy_only_burns_a_point() {
        let mut arena = Arena::new(5, 1);
        let enemy = arena.enemy(&goblin(), Position::new(0, 0));
        arena.hero(Position::new(2, 0));
        if let Some(profile) = arena.world.get_mut(enemy).and_then(|c| c.enemy_profile_mut()) {
            profile.stun_ticks = 2;
        }

        assert!(arena.tick(enemy));

        assert_eq!(arena.position(enemy), Some(Position::new(0, 0)));
        assert_eq!(arena.state(enemy), AiState::Idle);
        assert_eq!(arena.action_points(enemy), 2);
        let stun = arena
            .world
            .get(enemy)
            .and_then(|c| c.enemy_profile())
            .map(|p| p.stun_ticks);
        assert_eq!(stun, Some(1));
    }

    #[test]
    fn heard_sound_is_investigated_then_dropped() {
        let mut arena = Arena::new(5, 1);
        let enemy = arena.enemy(&goblin(), Position::new(0, 0));
        arena
            .world
            .map_mut()
            .add_sound(Position::new(1, 0), 2, SoundSource::DoorBash, 3);

        arena.tick(enemy);

        assert!(arena.events.contains(&GameEvent::AiStateChanged {
            enemy,
            from: AiState::Idle,
            to: AiState::Investigate,
        }));
        assert_eq!(arena.state(enemy), AiState::Patrol);
        let target = arena
            .world
            .get(enemy)
            .and_then(|c| c.enemy_profile())
            .and_then(|p| p.target);
        assert_eq!(target, None);
    }

    #[test]
    fn guard_walks_back_to_its_post() {
        let mut arena = Arena::new(6, 1);
        let mut sentry = goblin();
        sentry.ai = AiBehavior::Guard;
        let enemy = arena.enemy(&sentry, Position::new(0, 0));
        arena
            .world
            .step(enemy, Position::new(1, 0))
            .expect("step");
        for x in 2..5 {
            arena.world.step(enemy, Position::new(x, 0)).expect("step");
        }
        if let Some(profile) = arena.world.get_mut(enemy).and_then(|c| c.enemy_profile_mut()) {
            profile.state = AiState::Guard;
        }

        arena.tick(enemy);
        assert_eq!(arena.position(enemy), Some(Position::new(3, 0)));

        arena.tick(enemy);
        arena.tick(enemy);
        assert_eq!(arena.position(enemy), Some(Position::new(1, 0)));
        assert_eq!(arena.action_points(enemy), 0);
        assert!(!arena.tick(enemy));
    }

    #[test]
    fn every_tick_costs_one_point_until_exhausted() {
        let mut arena = Arena::new(8, 8);
        let enemy = arena.enemy(&goblin(), Position::new(4, 4));
        let mut ticks = 0;
        while arena.tick(enemy) {
            ticks += 1;
            assert!(ticks <= 3, "enemy phase must terminate");
        }
        assert_eq!(ticks, 3);
        assert_eq!(arena.action_points(enemy), 0);
    }

    #[test]
    fn dead_target_is_forgotten() {
        let mut arena = Arena::new(6, 1);
        let enemy = arena.enemy(&goblin(), Position::new(0, 0));
        let hero = arena.hero(Position::new(2, 0));
        arena.tick(enemy);
        if let Some(hero) = arena.world.get_mut(hero) {
            hero.take_damage(u32::MAX);
        }
        arena.world.remove_from_map(hero);

        arena.tick(enemy);

        assert_eq!(arena.state(enemy), AiState::Patrol);
    }
}
