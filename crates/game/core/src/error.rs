//! Common error infrastructure for game-core.
//!
//! Domain-specific errors (`MapError`, `ActionError`) live next to the code that
//! raises them. This module carries the shared classification used by the
//! runtime to decide how loudly to report a failure.
//!
//! Nothing in the rules layer is fatal: an invalid action is rejected with a
//! reason and leaves state untouched, and missing data is replaced by a
//! fallback before it can become an error.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same intent may succeed later (blocked cell, no AP left this turn)
/// - **Validation**: the request itself is malformed (unknown target, invalid index)
/// - **Internal**: state inconsistency that indicates a bug
/// - **Fatal**: reserved for corrupted state; the rules layer never produces it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Can retry with the same or an alternative action.
    ///
    /// Examples: destination blocked, target out of range
    Recoverable,

    /// Invalid input, should not retry without changes.
    ///
    /// Examples: combatant not found, party index out of range
    Validation,

    /// Unexpected state inconsistency.
    ///
    /// Examples: occupancy index desync
    Internal,

    /// Game state corrupted, cannot continue.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all game-core errors.
///
/// Use `#[derive(thiserror::Error)]` for the Display/Error impl and classify
/// severity by recoverability, not by impact.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for the variant, used in logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
