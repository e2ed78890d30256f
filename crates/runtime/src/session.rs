//! Session orchestrator.
//!
//! [`GameSession`] owns the engine, the event bus and the save repository.
//! Every entry point forwards to the engine, publishes whatever events the
//! engine buffered and answers with an [`ActionReport`]. Party changes,
//! character creation and skill improvement are followed by an autosave when
//! it is enabled.
use std::fmt;

use game_content::{ContentFactory, default_group, default_roster};
use game_core::{
    ActionError, Archetype, Direction, DoorAction, EntityId, EquipmentSlot, GameConfig,
    GameEngine, GameError, LevelState, MapDefinition, MonsterCatalog, Outcome, Skill, TurnOutcome, TurnStats,
};

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::events::EventBus;
use crate::repository::{FileSaveRepository, RepositoryError, SaveGame, SaveRepository};

/// What the player is told after an entry point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionReport {
    pub success: bool,
    pub message: String,
    /// Stable code of the rejection, when it came from the rules.
    pub error_code: Option<&'static str>,
}

impl ActionReport {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error_code: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error_code: None,
        }
    }
}

impl From<std::result::Result<Outcome, ActionError>> for ActionReport {
    fn from(result: std::result::Result<Outcome, ActionError>) -> Self {
        match result {
            Ok(outcome) => Self::success(outcome.message),
            Err(err) => Self {
                error_code: Some(err.error_code()),
                ..Self::failure(err.to_string())
            },
        }
    }
}

impl fmt::Display for ActionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Starting state pulled out of a save, or the defaults.
struct PartySeed {
    roster: Vec<game_core::Combatant>,
    group: Vec<EntityId>,
    active_index: usize,
    round: u64,
    level: Option<LevelState>,
}

impl PartySeed {
    fn from_save(save: Option<SaveGame>) -> Self {
        match save {
            Some(save) => Self {
                roster: save.roster,
                group: save.group,
                active_index: save.active_index,
                round: save.round,
                level: save.level,
            },
            None => {
                let roster = default_roster();
                let group = default_group(&roster);
                Self {
                    roster,
                    group,
                    active_index: 0,
                    round: 1,
                    level: None,
                }
            }
        }
    }
}

pub struct GameSession {
    engine: GameEngine,
    bus: EventBus,
    repository: Box<dyn SaveRepository>,
    map_name: String,
    autosave: bool,
}

impl GameSession {
    /// Starts a session saving to `config.save_dir`.
    pub fn open(config: &RuntimeConfig) -> Result<Self> {
        let repository = FileSaveRepository::new(&config.save_dir)?;
        Self::start(config, Box::new(repository))
    }

    /// Loads content from `config.data_dir` and resumes the stored save, or
    /// starts the default party when there is no usable save.
    pub fn start(config: &RuntimeConfig, repository: Box<dyn SaveRepository>) -> Result<Self> {
        let factory = ContentFactory::new(&config.data_dir);
        let mut game_config = factory.config_or_default();
        if let Some(seed) = config.seed {
            game_config.seed = seed;
        }
        let catalog = factory.monsters_or_default();

        let save = restore_save(repository.as_ref());
        let map_name = save
            .as_ref()
            .map_or(config.map_name.as_str(), |save| save.map_name.as_str())
            .to_string();
        let definition = factory.map_or_default(&map_name);

        Self::assemble(
            &definition,
            catalog,
            game_config,
            save,
            repository,
            config.autosave,
        )
    }

    /// Builds a session from content already in memory. A level stored in
    /// `save` takes precedence over `definition`.
    pub fn assemble(
        definition: &MapDefinition,
        catalog: MonsterCatalog,
        game_config: GameConfig,
        save: Option<SaveGame>,
        repository: Box<dyn SaveRepository>,
        autosave: bool,
    ) -> Result<Self> {
        let seed = PartySeed::from_save(save);
        let resumed = seed.level.and_then(|level| {
            GameEngine::resume(level, catalog.clone(), game_config.clone(), seed.roster.clone())
                .map_err(|err| {
                    tracing::warn!(
                        target: "runtime::session",
                        error = %err,
                        "stored level rejected, rebuilding from the map definition"
                    );
                })
                .ok()
        });
        let mut engine = match resumed {
            Some(engine) => engine,
            None => GameEngine::with_roster(definition, catalog, game_config, seed.roster)
                .map_err(RuntimeError::Level)?,
        };

        let group: Vec<EntityId> = seed
            .group
            .into_iter()
            .filter(|id| engine.combatant(*id).is_some_and(|c| c.is_alive()))
            .take(GameConfig::MAX_PARTY_SIZE)
            .collect();
        if let Err(err) = engine.set_group(&group) {
            tracing::warn!(target: "runtime::session", error = %err, "stored group rejected");
        }
        if seed.active_index > 0 && engine.switch_active(seed.active_index).is_err() {
            tracing::debug!(
                target: "runtime::session",
                index = seed.active_index,
                "stored active index out of range"
            );
        }
        engine.set_round(seed.round);
        // Restoring the party is not something subscribers need to hear about.
        engine.drain_events();

        let map_name = engine.map().name().to_string();
        tracing::info!(
            target: "runtime::session",
            map = map_name.as_str(),
            round = engine.round(),
            roster = engine.party().roster().len(),
            group = engine.party().group().len(),
            "session ready"
        );

        Ok(Self {
            engine,
            bus: EventBus::new(),
            repository,
            map_name,
            autosave,
        })
    }

    // ===== queries =====

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn repository(&self) -> &dyn SaveRepository {
        self.repository.as_ref()
    }

    pub fn map_name(&self) -> &str {
        &self.map_name
    }

    pub fn stats(&self) -> TurnStats {
        self.engine.stats()
    }

    // ===== actions =====

    pub fn move_active(&mut self, direction: Direction) -> ActionReport {
        let result = self.engine.move_active(direction);
        self.finish(result)
    }

    pub fn attack(&mut self, target: EntityId) -> ActionReport {
        let result = self.engine.attack(target);
        self.finish(result)
    }

    pub fn attack_nearby(&mut self) -> ActionReport {
        let result = self.engine.attack_nearby();
        self.finish(result)
    }

    pub fn use_skill(&mut self, skill: Skill) -> ActionReport {
        let result = self.engine.use_skill(skill);
        self.finish(result)
    }

    pub fn interact_door(&mut self, action: DoorAction, direction: Option<Direction>) -> ActionReport {
        let result = self.engine.interact_door(action, direction);
        self.finish(result)
    }

    pub fn pick_up(&mut self) -> ActionReport {
        let result = self.engine.pick_up();
        self.finish(result)
    }

    pub fn use_item(&mut self, index: usize) -> ActionReport {
        let result = self.engine.use_item(index);
        self.finish(result)
    }

    pub fn equip_item(&mut self, index: usize) -> ActionReport {
        let result = self.engine.equip_item(index);
        self.finish(result)
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> ActionReport {
        let result = self.engine.unequip(slot);
        self.finish(result)
    }

    pub fn improve_skill(&mut self, character: EntityId, skill: Skill) -> ActionReport {
        let result = self.engine.improve_skill(character, skill);
        self.finish_and_save(result)
    }

    // ===== party =====

    pub fn create_character(&mut self, name: &str, archetype: Archetype) -> ActionReport {
        let result = self
            .engine
            .create_character(name, archetype)
            .map(|_| Outcome::new(format!("{name} the {archetype} joins the roster")));
        self.finish_and_save(result)
    }

    pub fn toggle_group_member(&mut self, id: EntityId) -> ActionReport {
        let result = self.engine.toggle_group_member(id).map(|joined| {
            let name = self.name_of(id);
            if joined {
                Outcome::new(format!("{name} joins the group"))
            } else {
                Outcome::new(format!("{name} leaves the group"))
            }
        });
        self.finish_and_save(result)
    }

    pub fn set_group(&mut self, members: &[EntityId]) -> ActionReport {
        let result = self
            .engine
            .set_group(members)
            .map(|()| Outcome::new(format!("Group of {} ready", members.len())));
        self.finish_and_save(result)
    }

    pub fn switch_active(&mut self, index: usize) -> ActionReport {
        let result = self
            .engine
            .switch_active(index)
            .map(|id| Outcome::new(format!("{} takes the lead", self.name_of(id))));
        self.finish(result)
    }

    pub fn next_member(&mut self) -> ActionReport {
        let result = self.engine.next_member().ok_or(ActionError::NoActiveMember);
        let result = result.map(|id| Outcome::new(format!("{} takes the lead", self.name_of(id))));
        self.finish(result)
    }

    pub fn previous_member(&mut self) -> ActionReport {
        let result = self
            .engine
            .previous_member()
            .ok_or(ActionError::NoActiveMember);
        let result = result.map(|id| Outcome::new(format!("{} takes the lead", self.name_of(id))));
        self.finish(result)
    }

    // ===== turns =====

    pub fn end_turn(&mut self) -> TurnOutcome {
        let outcome = self.engine.end_turn();
        self.publish_events();
        outcome
    }

    pub fn confirm_end_turn(&mut self) -> TurnOutcome {
        let outcome = self.engine.confirm_end_turn();
        self.publish_events();
        outcome
    }

    // ===== persistence =====

    pub fn save(&self) -> std::result::Result<(), RepositoryError> {
        self.repository
            .save(&SaveGame::capture(&self.engine, &self.map_name))
    }

    // ===== internals =====

    fn name_of(&self, id: EntityId) -> String {
        self.engine
            .combatant(id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn finish(&mut self, result: std::result::Result<Outcome, ActionError>) -> ActionReport {
        if let Err(err) = &result {
            let severity = err.severity();
            let code = err.error_code();
            if severity.is_internal() {
                tracing::error!(target: "runtime::session", error = %err, code, severity = severity.as_str(), "action failed");
            } else if severity.is_recoverable() {
                tracing::info!(target: "runtime::session", error = %err, code, "action deferred");
            } else {
                tracing::debug!(target: "runtime::session", error = %err, code, "action rejected");
            }
        }
        self.publish_events();
        ActionReport::from(result)
    }

    fn finish_and_save(&mut self, result: std::result::Result<Outcome, ActionError>) -> ActionReport {
        let changed = result.is_ok();
        let report = self.finish(result);
        if changed
            && self.autosave
            && let Err(err) = self.save()
        {
            tracing::warn!(target: "runtime::session", error = %err, "autosave failed");
        }
        report
    }

    fn publish_events(&mut self) {
        for event in self.engine.drain_events() {
            self.bus.publish(event);
        }
    }
}

/// A usable save from `repository`, or `None` with a warning when the save is
/// unreadable or from another version.
fn restore_save(repository: &dyn SaveRepository) -> Option<SaveGame> {
    match repository.load() {
        Ok(Some(save)) if save.is_compatible() => Some(save),
        Ok(Some(save)) => {
            tracing::warn!(
                target: "runtime::session",
                found = save.version.as_str(),
                expected = crate::repository::SAVE_VERSION,
                "save version mismatch, starting a new game"
            );
            None
        }
        Ok(None) => {
            tracing::info!(target: "runtime::session", "no save found, starting a new game");
            None
        }
        Err(err) => {
            tracing::warn!(
                target: "runtime::session",
                error = %err,
                "save unreadable, starting a new game"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use game_content::fallback_catalog;
    use game_core::{GameEvent, GameEventKind, Position};

    use super::*;
    use crate::repository::{InMemorySaveRepository, SAVE_VERSION};

    fn quiet() -> GameConfig {
        GameConfig {
            spawn_chance_percent: 0,
            ..GameConfig::default()
        }
    }

    fn session_with(save: Option<SaveGame>, autosave: bool) -> GameSession {
        GameSession::assemble(
            &MapDefinition::walled("hall", 16, 16),
            fallback_catalog(),
            quiet(),
            save,
            Box::new(InMemorySaveRepository::new()),
            autosave,
        )
        .expect("valid level")
    }

    #[test]
    fn new_game_uses_the_default_party() {
        let session = session_with(None, false);
        let party = session.engine().party();
        assert_eq!(party.roster().len(), 4);
        assert_eq!(party.group(), &[EntityId(1), EntityId(2), EntityId(3)]);
        assert_eq!(session.stats().active_name.as_deref(), Some("Thorin"));
        assert_eq!(session.engine().round(), 1);
        assert_eq!(session.bus().history().count(), 0);
    }

    #[test]
    fn actions_report_and_publish() {
        let mut session = session_with(None, false);
        let moves = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&moves);
        session
            .bus_mut()
            .subscribe(GameEventKind::PlayerMoved, move |event| {
                sink.borrow_mut().push(event.clone());
                Ok(())
            });

        let report = session.move_active(Direction::North);
        assert_eq!(report, ActionReport::success("Thorin moves north"));
        assert_eq!(
            *moves.borrow(),
            vec![GameEvent::PlayerMoved {
                combatant: EntityId(1),
                from: Position::new(6, 6),
                to: Position::new(6, 5),
            }]
        );

        let rejected = session.attack(EntityId(99));
        assert!(!rejected.success);
        assert_eq!(rejected.message, "No such combatant #99");
        assert_eq!(rejected.error_code, Some("ACTION_UNKNOWN_COMBATANT"));
    }

    #[test]
    fn party_changes_autosave() {
        let mut session = session_with(None, true);
        assert!(!session.repository().exists());

        let report = session.toggle_group_member(EntityId(2));
        assert_eq!(report.message, "Zara leaves the group");
        let saved = session.repository().load().expect("readable").expect("autosaved");
        assert_eq!(saved.group, vec![EntityId(1), EntityId(3)]);
        assert_eq!(saved.version, SAVE_VERSION);

        session.create_character("Brom", Archetype::Warrior);
        let saved = session.repository().load().expect("readable").expect("autosaved");
        assert_eq!(saved.roster.len(), 5);
        assert_eq!(saved.group.len(), 3);
    }

    #[test]
    fn rejected_party_changes_do_not_save() {
        let mut session = session_with(None, true);
        let report = session.toggle_group_member(EntityId(4));
        assert!(!report.success);
        assert_eq!(report.message, "Group is full");
        assert_eq!(report.error_code, Some("PARTY_FULL"));
        assert!(!session.repository().exists());
    }

    #[test]
    fn resumed_session_keeps_party_and_round() {
        let mut first = session_with(None, false);
        first.set_group(&[EntityId(4), EntityId(1)]);
        first.switch_active(1);
        let mut save = SaveGame::capture(first.engine(), first.map_name());
        save.round = 9;

        let second = session_with(Some(save), false);
        let party = second.engine().party();
        assert_eq!(party.group(), &[EntityId(4), EntityId(1)]);
        assert_eq!(party.active(), Some(EntityId(1)));
        assert_eq!(second.engine().round(), 9);
        assert_eq!(
            second.engine().combatant(EntityId(4)).and_then(|c| c.position),
            Some(Position::new(7, 7))
        );
        assert_eq!(party.parked_at(EntityId(2)), Some(Position::new(7, 6)));
    }

    #[test]
    fn incompatible_save_starts_a_new_game() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut stale = SaveGame::capture(session_with(None, false).engine(), "hall");
        stale.version = "0.9.0".to_string();
        stale.round = 12;

        let config = RuntimeConfig {
            data_dir: dir.path().to_path_buf(),
            ..RuntimeConfig::default()
        };
        let session = GameSession::start(&config, Box::new(InMemorySaveRepository::with_save(stale)))
            .expect("fallback content");
        assert_eq!(session.engine().round(), 1);
        assert_eq!(session.map_name(), "fallback");
        assert_eq!(session.engine().party().group().len(), 3);
    }
}
