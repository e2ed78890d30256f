//! Sessions over the bundled content and a real save directory.
use std::path::PathBuf;

use game_core::{Border, Direction, DoorAction, EntityId, GameEvent, Position, TurnOutcome};
use runtime::{FileSaveRepository, GameSession, RuntimeConfig, SaveRepository};

fn config(save_dir: PathBuf) -> RuntimeConfig {
    RuntimeConfig {
        data_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data"),
        save_dir,
        seed: Some(77),
        autosave: true,
        ..RuntimeConfig::default()
    }
}

fn play_rounds(session: &mut GameSession, rounds: u64) {
    for _ in 0..rounds {
        session.move_active(Direction::South);
        session.attack_nearby();
        if let TurnOutcome::ConfirmationRequired { .. } = session.end_turn() {
            session.confirm_end_turn();
        }
    }
}

#[test]
fn party_survives_a_restart() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = config(dir.path().join("saves"));

    let mut first = GameSession::open(&config).expect("session");
    assert_eq!(first.map_name(), "crypt");
    assert!(first.toggle_group_member(EntityId(3)).success);
    assert!(first.toggle_group_member(EntityId(4)).success);
    play_rounds(&mut first, 2);
    first.save().expect("save");

    let repository = FileSaveRepository::new(&config.save_dir).expect("repo");
    assert!(repository.exists());

    let second = GameSession::open(&config).expect("session");
    assert_eq!(second.map_name(), "crypt");
    assert_eq!(second.engine().round(), first.engine().round());
    assert_eq!(
        second.engine().party().group(),
        first.engine().party().group()
    );
    assert_eq!(
        second.engine().party().roster(),
        first.engine().party().roster()
    );
}

#[test]
fn bashed_door_and_enemies_survive_a_restart() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = config(dir.path().join("saves"));
    let doorway = Position::new(8, 4);

    let mut first = GameSession::open(&config).expect("session");
    assert!(first.engine().map().border_at(doorway, Direction::East).is_door());
    for step in [Direction::North, Direction::North, Direction::East, Direction::East] {
        assert!(first.move_active(step).success, "step {step}");
    }
    let report = first.interact_door(DoorAction::Bash, Some(Direction::East));
    assert!(report.success, "{report}");
    first.save().expect("save");

    let second = GameSession::open(&config).expect("session");
    assert_eq!(second.engine().map().border_at(doorway, Direction::East), Border::NONE);
    assert!(!second.engine().map().sounds().is_empty());
    let enemies = |session: &GameSession| {
        session
            .engine()
            .world()
            .living_enemy_ids()
            .into_iter()
            .filter_map(|id| session.engine().combatant(id).cloned())
            .collect::<Vec<_>>()
    };
    assert_eq!(enemies(&second), enemies(&first));
    assert_eq!(
        second.engine().combatant(EntityId(1)).and_then(|c| c.position),
        Some(doorway)
    );
}

#[test]
fn same_seed_same_story() {
    let run = || {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut session = GameSession::open(&config(dir.path().to_path_buf())).expect("session");
        play_rounds(&mut session, 4);
        session.bus().history().cloned().collect::<Vec<GameEvent>>()
    };
    let first = run();
    assert!(!first.is_empty());
    assert_eq!(first, run());
}

#[test]
fn corrupted_save_starts_fresh() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = config(dir.path().to_path_buf());
    std::fs::write(dir.path().join(FileSaveRepository::FILE_NAME), "garbage").expect("write");

    let session = GameSession::open(&config).expect("session");
    assert_eq!(session.engine().round(), 1);
    assert_eq!(session.engine().party().roster().len(), 4);
}
