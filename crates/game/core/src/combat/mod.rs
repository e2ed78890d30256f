//! Attack, defense and skill-use resolution.
//!
//! Characters attack with dice: the successes of their weapon skill roll are
//! the damage, and the defender does not roll. Enemies attack with their flat
//! attack stat, which the defender reduces with a reaction-funded defense roll.
mod attack;
mod defense;
mod skill_use;

pub use attack::{AttackMode, AttackProfile, AttackReport, resolve_attack};
pub use defense::{DefenseKind, defense_skill, roll_defense};
pub use skill_use::{SkillEffect, SkillUse, plan_skill_use, skill_cost};
