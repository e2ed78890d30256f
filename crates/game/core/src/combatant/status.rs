use arrayvec::ArrayVec;

use crate::config::GameConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum StatusKind {
    /// Deals `magnitude` damage per round.
    Poison,
    /// Heals `magnitude` per round.
    Regeneration,
    /// Adds `magnitude` to flat attack damage.
    AttackBoost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub magnitude: u32,
    /// Rounds left.
    pub duration: u32,
}

/// Net result of one round of status effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct StatusTick {
    pub damage: u32,
    pub healing: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { GameConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    /// Adds an effect. When the list is full the shortest-lived effect is
    /// replaced if the new one outlasts it.
    pub fn apply(&mut self, effect: StatusEffect) {
        if self.effects.try_push(effect).is_ok() {
            return;
        }
        if let Some((index, shortest)) = self
            .effects
            .iter()
            .map(|existing| existing.duration)
            .enumerate()
            .min_by_key(|(_, duration)| *duration)
            && shortest < effect.duration
        {
            self.effects[index] = effect;
        }
    }

    pub fn attack_bonus(&self) -> u32 {
        self.effects
            .iter()
            .filter(|effect| effect.kind == StatusKind::AttackBoost)
            .map(|effect| effect.magnitude)
            .sum()
    }

    /// Applies one round: sums damage and healing, ages every effect and
    /// drops the expired ones.
    pub fn tick(&mut self) -> StatusTick {
        let mut outcome = StatusTick::default();
        for effect in &mut self.effects {
            match effect.kind {
                StatusKind::Poison => outcome.damage += effect.magnitude,
                StatusKind::Regeneration => outcome.healing += effect.magnitude,
                StatusKind::AttackBoost => {}
            }
            effect.duration = effect.duration.saturating_sub(1);
        }
        self.effects.retain(|effect| effect.duration > 0);
        outcome
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effect(kind: StatusKind, magnitude: u32, duration: u32) -> StatusEffect {
        StatusEffect {
            kind,
            magnitude,
            duration,
        }
    }

    #[test]
    fn tick_reports_and_expires() {
        let mut effects = StatusEffects::default();
        effects.apply(effect(StatusKind::Poison, 2, 1));
        effects.apply(effect(StatusKind::Regeneration, 1, 2));

        assert_eq!(effects.tick(), StatusTick { damage: 2, healing: 1 });
        assert_eq!(effects.tick(), StatusTick { damage: 0, healing: 1 });
        assert_eq!(effects.iter().count(), 0);
    }

    #[test]
    fn attack_boosts_stack() {
        let mut effects = StatusEffects::default();
        effects.apply(effect(StatusKind::AttackBoost, 2, 3));
        effects.apply(effect(StatusKind::AttackBoost, 1, 3));
        assert_eq!(effects.attack_bonus(), 3);
    }

    #[test]
    fn full_list_replaces_shortest() {
        let mut effects = StatusEffects::default();
        for _ in 0..GameConfig::MAX_STATUS_EFFECTS {
            effects.apply(effect(StatusKind::Poison, 1, 2));
        }
        effects.apply(effect(StatusKind::AttackBoost, 4, 5));
        assert_eq!(effects.attack_bonus(), 4);
        assert_eq!(effects.iter().count(), GameConfig::MAX_STATUS_EFFECTS);
    }
}
