//! Deterministic rules for a turn-based party dungeon crawler.
//!
//! `game-core` owns the grid and its borders, pathfinding, perception, the
//! dice-pool resolution model, character progression, combatants with their
//! enemy decision machine, and the turn/round controller. It performs no I/O:
//! content arrives as plain data records and every state change is reported
//! as a buffered [`GameEvent`]. All mutation flows through
//! [`engine::GameEngine`].
pub mod ai;
pub mod combat;
pub mod combatant;
pub mod config;
pub mod context;
pub mod dice;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod grid;
pub mod pathfinding;
pub mod perception;
pub mod state;
pub mod stats;
pub mod world;

pub use ai::{Aggression, AiBehavior, AiState, AiTarget};
pub use combat::{AttackReport, DefenseKind, SkillEffect};
pub use combatant::{
    Capabilities, Combatant, CombatantKind, EnemyProfile, Equipment, EquipmentSlot, Inventory,
    Item, ItemKind, StatBonus, StatusEffect, StatusKind, WeaponCategory,
};
pub use config::GameConfig;
pub use dice::DiceRoll;
pub use engine::{
    ActionError, DoorAction, GameEngine, GroundPile, LevelState, Outcome, Party, TurnOutcome,
    TurnStats,
};
pub use env::{
    EntitySpec, GameRng, MapDefinition, MonsterCatalog, MonsterRewards, MonsterStats,
    MonsterTemplate,
};
pub use error::{ErrorSeverity, GameError};
pub use events::{GameEvent, GameEventKind};
pub use grid::{Border, BorderKind, GridMap, MapError, SoundEvent, SoundSource, Tile, TileKind};
pub use state::{Direction, EntityId, Position, ResourceMeter};
pub use stats::{Archetype, Attribute, AttributeSet, DerivedStats, Skill, SkillGroup, SkillLevels, SkillPools};
pub use world::{World, WorldError};
