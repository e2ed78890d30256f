//! Rejections surfaced by engine entry points.
//!
//! Every variant is an invalid action: the engine checks before it mutates,
//! so a rejected action leaves the game untouched. The `Display` text is the
//! message shown to the player.
use crate::combatant::EquipmentSlot;
use crate::error::{ErrorSeverity, GameError};
use crate::state::EntityId;
use crate::stats::ImproveBlocker;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("No active character")]
    NoActiveMember,

    #[error("{name} is down")]
    ActorDead { name: String },

    #[error("Not enough action points ({available} of {required})")]
    NotEnoughActionPoints { required: u32, available: u32 },

    #[error("The way is blocked")]
    Blocked,

    #[error("No such combatant {0}")]
    UnknownCombatant(EntityId),

    #[error("{0} is not a valid target")]
    InvalidTarget(EntityId),

    #[error("Target is out of range ({distance} > {range})")]
    OutOfRange { distance: u32, range: u32 },

    #[error("No line of sight to the target")]
    NoLineOfSight,

    #[error("No enemy within reach")]
    NoTargetInReach,

    #[error("No door nearby")]
    NoDoorNearby,

    #[error("Nothing to pick up here")]
    NothingToPickUp,

    #[error("Inventory is full")]
    InventoryFull,

    #[error("No item in slot {0}")]
    NoSuchItem(usize),

    #[error("{0} cannot be used or equipped")]
    NotUsable(String),

    #[error("Nothing equipped in the {0} slot")]
    EmptySlot(EquipmentSlot),

    #[error("Cannot improve skill: {0}")]
    ImproveBlocked(#[from] ImproveBlocker),

    #[error("Group is full")]
    PartyFull,

    #[error("A group holds at most {max} characters")]
    GroupTooLarge { max: usize },

    #[error("{0} is not in the roster")]
    NotInRoster(EntityId),

    #[error("{0} appears twice in the group")]
    DuplicateMember(EntityId),

    #[error("No group member at index {0}")]
    InvalidIndex(usize),

    #[error("Nowhere to place {0}")]
    NoDeploymentCell(EntityId),
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoDeploymentCell(_) => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoActiveMember => "ACTION_NO_ACTIVE_MEMBER",
            Self::ActorDead { .. } => "ACTION_ACTOR_DEAD",
            Self::NotEnoughActionPoints { .. } => "ACTION_NOT_ENOUGH_AP",
            Self::Blocked => "ACTION_BLOCKED",
            Self::UnknownCombatant(_) => "ACTION_UNKNOWN_COMBATANT",
            Self::InvalidTarget(_) => "ACTION_INVALID_TARGET",
            Self::OutOfRange { .. } => "ACTION_OUT_OF_RANGE",
            Self::NoLineOfSight => "ACTION_NO_LINE_OF_SIGHT",
            Self::NoTargetInReach => "ACTION_NO_TARGET_IN_REACH",
            Self::NoDoorNearby => "ACTION_NO_DOOR_NEARBY",
            Self::NothingToPickUp => "ACTION_NOTHING_TO_PICK_UP",
            Self::InventoryFull => "ACTION_INVENTORY_FULL",
            Self::NoSuchItem(_) => "ACTION_NO_SUCH_ITEM",
            Self::NotUsable(_) => "ACTION_NOT_USABLE",
            Self::EmptySlot(_) => "ACTION_EMPTY_SLOT",
            Self::ImproveBlocked(_) => "ACTION_IMPROVE_BLOCKED",
            Self::PartyFull => "PARTY_FULL",
            Self::GroupTooLarge { .. } => "PARTY_GROUP_TOO_LARGE",
            Self::NotInRoster(_) => "PARTY_NOT_IN_ROSTER",
            Self::DuplicateMember(_) => "PARTY_DUPLICATE_MEMBER",
            Self::InvalidIndex(_) => "PARTY_INVALID_INDEX",
            Self::NoDeploymentCell(_) => "PARTY_NO_DEPLOYMENT_CELL",
        }
    }
}
