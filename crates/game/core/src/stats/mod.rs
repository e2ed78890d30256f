//! Character statistics.
//!
//! ```text
//! [ Attributes ]  fixed at creation
//!      ↓
//! [ Skills + group pools ]  raised with skill points
//!      ↓
//! [ Derived stats ]  recomputed on level-up and skill improvement
//! ```
//!
//! Everything here is a pure function of its inputs; mutation happens on the
//! combatant that owns the values.
mod attributes;
mod derived;
mod progression;
mod skills;

pub use attributes::{Attribute, AttributeSet};
pub use derived::DerivedStats;
pub use progression::{
    Archetype, ImproveBlocker, attribute_threshold, check_improve, experience_to_next,
    highest_governing,
};
pub use skills::{Skill, SkillGroup, SkillLevels, SkillPools};
