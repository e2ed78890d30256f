//! Player actions taken by the active group member.
use super::{ActionError, GameEngine, Outcome};
use crate::combat::{SkillEffect, plan_skill_use};
use crate::combatant::{Combatant, EquipmentSlot, ItemKind};
use crate::config::GameConfig;
use crate::events::GameEvent;
use crate::grid::SoundSource;
use crate::perception::line_of_sight;
use crate::state::{Direction, EntityId, Position};
use crate::stats::Skill;

/// What to do with a door next to the active member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum DoorAction {
    /// Opens a closed door or closes an open one.
    Toggle,
    /// Destroys the door. Loud.
    Bash,
}

impl GameEngine {
    /// Living, placed active member with at least `cost` action points.
    fn acting_member(&self, cost: u32) -> Result<(EntityId, Position), ActionError> {
        let id = self.party.active().ok_or(ActionError::NoActiveMember)?;
        let member = self
            .world
            .get(id)
            .ok_or(ActionError::UnknownCombatant(id))?;
        let position = match member.position {
            Some(position) if member.is_alive() => position,
            _ => {
                return Err(ActionError::ActorDead {
                    name: member.name.clone(),
                });
            }
        };
        let available = member.action_points.current;
        if available < cost {
            return Err(ActionError::NotEnoughActionPoints {
                required: cost,
                available,
            });
        }
        Ok((id, position))
    }

    fn spend(&mut self, id: EntityId, cost: u32) {
        if let Some(member) = self.world.get_mut(id) {
            member.spend_action_points(cost);
        }
    }

    fn name_of(&self, id: EntityId) -> String {
        self.world
            .get(id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn move_active(&mut self, direction: Direction) -> Result<Outcome, ActionError> {
        let (id, from) = self.acting_member(GameConfig::ACTION_COST)?;
        let to = from.step(direction);
        if !self.world.can_step(from, to) {
            return Err(ActionError::Blocked);
        }
        self.rules()
            .step(id, to)
            .map_err(|_| ActionError::Blocked)?;
        self.events.push(GameEvent::PlayerMoved {
            combatant: id,
            from,
            to,
        });
        Ok(Outcome::new(format!("{} moves {direction}", self.name_of(id))))
    }

    /// Checks that `target` is a living enemy the attacker can hit from `from`.
    fn check_target(&self, attacker: &Combatant, from: Position, target: EntityId) -> Result<(), ActionError> {
        let victim = self
            .world
            .get(target)
            .ok_or(ActionError::UnknownCombatant(target))?;
        let Some(goal) = victim.position.filter(|_| victim.is_enemy() && victim.is_alive()) else {
            return Err(ActionError::InvalidTarget(target));
        };
        let distance = from.manhattan(goal);
        let range = attacker.weapon_range();
        if distance > range {
            return Err(ActionError::OutOfRange { distance, range });
        }
        if !line_of_sight(self.world.map(), from, goal) {
            return Err(ActionError::NoLineOfSight);
        }
        Ok(())
    }

    pub fn attack(&mut self, target: EntityId) -> Result<Outcome, ActionError> {
        let (id, from) = self.acting_member(GameConfig::ACTION_COST)?;
        let attacker = self
            .world
            .get(id)
            .ok_or(ActionError::UnknownCombatant(id))?;
        self.check_target(attacker, from, target)?;

        let attacker_name = attacker.name.clone();
        let target_name = self.name_of(target);
        // Paid up front: a kill can level the attacker up and refill the pool.
        self.spend(id, GameConfig::ACTION_COST);
        let report = self
            .rules()
            .attack(id, target)
            .ok_or(ActionError::UnknownCombatant(target))?;
        self.events.push(GameEvent::PlayerAttacked {
            attacker: id,
            target,
            damage: report.damage,
        });
        tracing::debug!(
            target: "game::engine",
            attacker = %id,
            target = %target,
            successes = report.attack_successes,
            damage = report.damage,
            "player attack"
        );

        let mut message = if report.damage > 0 {
            format!("{attacker_name} hits {target_name} for {} damage", report.damage)
        } else {
            format!("{attacker_name} misses {target_name}")
        };
        if report.killed {
            message.push_str(&format!(". {target_name} is slain!"));
        }
        Ok(Outcome::new(message))
    }

    /// Attacks the first enemy (in id order) the active member can reach.
    pub fn attack_nearby(&mut self) -> Result<Outcome, ActionError> {
        let (id, from) = self.acting_member(GameConfig::ACTION_COST)?;
        let attacker = self
            .world
            .get(id)
            .ok_or(ActionError::UnknownCombatant(id))?;
        let target = self
            .world
            .living_enemy_ids()
            .into_iter()
            .find(|enemy| self.check_target(attacker, from, *enemy).is_ok())
            .ok_or(ActionError::NoTargetInReach)?;
        self.attack(target)
    }

    pub fn use_skill(&mut self, skill: Skill) -> Result<Outcome, ActionError> {
        let (id, position) = self.acting_member(0)?;
        let member = self
            .world
            .get(id)
            .ok_or(ActionError::UnknownCombatant(id))?;
        let planned = plan_skill_use(member, skill);
        let available = member.action_points.current;
        if available < planned.cost {
            return Err(ActionError::NotEnoughActionPoints {
                required: planned.cost,
                available,
            });
        }
        let name = member.name.clone();

        self.spend(id, planned.cost);
        if planned.loud {
            let duration = self.config.sound_duration;
            self.world.map_mut().add_sound(
                position,
                GameConfig::LOUD_SKILL_INTENSITY,
                SoundSource::Skill(skill),
                duration,
            );
        }
        self.events.push(GameEvent::SkillUsed {
            combatant: id,
            skill,
            effect: planned.effect,
        });

        let detail = match planned.effect {
            SkillEffect::Damage(damage) => format!("readies a blow for {damage} damage"),
            SkillEffect::Magical { power } => format!("channels power {power}"),
            SkillEffect::Stealth { bonus } => format!("slips into the shadows (+{bonus})"),
            SkillEffect::Defense { bonus } => format!("raises a guard (+{bonus})"),
            SkillEffect::General { bonus } => format!("succeeds with bonus {bonus}"),
        };
        Ok(Outcome::new(format!("{name} uses {skill}: {detail}")))
    }

    /// Opens, closes or bashes a door around the active member. Without a
    /// direction the first door found north, south, east, west is used.
    pub fn interact_door(
        &mut self,
        action: DoorAction,
        direction: Option<Direction>,
    ) -> Result<Outcome, ActionError> {
        let (id, position) = self.acting_member(GameConfig::ACTION_COST)?;
        let map = self.world.map();
        let direction = match direction {
            Some(direction) if map.border_at(position, direction).is_door() => direction,
            Some(_) => return Err(ActionError::NoDoorNearby),
            None => map
                .find_adjacent_door(position)
                .ok_or(ActionError::NoDoorNearby)?,
        };

        let message = match action {
            DoorAction::Toggle => {
                let open = self
                    .world
                    .map_mut()
                    .toggle_door(position, direction)
                    .ok_or(ActionError::NoDoorNearby)?;
                self.events.push(GameEvent::DoorToggled {
                    by: id,
                    position,
                    direction,
                    open,
                });
                if open { "Door opened!" } else { "Door closed!" }
            }
            DoorAction::Bash => {
                if !self.world.map_mut().destroy_door(position, direction) {
                    return Err(ActionError::NoDoorNearby);
                }
                let duration = self.config.sound_duration;
                self.world.map_mut().add_sound(
                    position,
                    GameConfig::DOOR_BASH_INTENSITY,
                    SoundSource::DoorBash,
                    duration,
                );
                self.events.push(GameEvent::DoorBashed {
                    by: id,
                    position,
                    direction,
                });
                "Door bashed and destroyed!"
            }
        };
        self.spend(id, GameConfig::ACTION_COST);
        Ok(Outcome::new(message))
    }

    /// Picks up the most recently dropped item on the active member's cell.
    pub fn pick_up(&mut self) -> Result<Outcome, ActionError> {
        let (id, position) = self.acting_member(GameConfig::ACTION_COST)?;
        if self.world.items_at(position).is_empty() {
            return Err(ActionError::NothingToPickUp);
        }
        if self.world.get(id).is_some_and(|c| c.inventory.is_full()) {
            return Err(ActionError::InventoryFull);
        }
        let item = self
            .world
            .take_item(position)
            .ok_or(ActionError::NothingToPickUp)?;
        let item_name = item.name.clone();
        if let Some(member) = self.world.get_mut(id)
            && let Err(item) = member.inventory.add(item)
        {
            self.world.drop_item(position, item);
            return Err(ActionError::InventoryFull);
        }
        self.spend(id, GameConfig::ACTION_COST);
        self.events.push(GameEvent::ItemPickedUp {
            combatant: id,
            item: item_name.clone(),
        });
        Ok(Outcome::new(format!("{} picks up {item_name}", self.name_of(id))))
    }

    /// Consumes an inventory item: heals by its HP bonus and applies its
    /// status effect.
    pub fn use_item(&mut self, index: usize) -> Result<Outcome, ActionError> {
        let (id, _) = self.acting_member(GameConfig::ACTION_COST)?;
        let member = self
            .world
            .get_mut(id)
            .ok_or(ActionError::UnknownCombatant(id))?;
        let item = member
            .inventory
            .items()
            .get(index)
            .ok_or(ActionError::NoSuchItem(index))?;
        if item.kind != ItemKind::Consumable {
            return Err(ActionError::NotUsable(item.name.clone()));
        }
        let item = member
            .inventory
            .take(index)
            .ok_or(ActionError::NoSuchItem(index))?;
        let healed = member.heal(item.bonus.hp);
        if let Some(effect) = item.effect {
            member.status_effects.apply(effect);
        }
        member.spend_action_points(GameConfig::ACTION_COST);
        Ok(Outcome::new(format!(
            "{} uses {} (+{healed} HP)",
            member.name, item.name
        )))
    }

    /// Equips an inventory item on the active member. The replaced item goes
    /// back to the inventory. Free action.
    pub fn equip_item(&mut self, index: usize) -> Result<Outcome, ActionError> {
        let (id, _) = self.acting_member(0)?;
        let member = self
            .world
            .get_mut(id)
            .ok_or(ActionError::UnknownCombatant(id))?;
        let item = member
            .inventory
            .items()
            .get(index)
            .ok_or(ActionError::NoSuchItem(index))?;
        if item.slot().is_none() {
            return Err(ActionError::NotUsable(item.name.clone()));
        }
        let item = member
            .inventory
            .take(index)
            .ok_or(ActionError::NoSuchItem(index))?;
        let item_name = item.name.clone();
        let replaced = match member.equip(item) {
            Ok(replaced) => replaced,
            Err(item) => {
                let name = item.name.clone();
                // Slot was checked above; put it back untouched.
                let _ = member.inventory.add(item);
                return Err(ActionError::NotUsable(name));
            }
        };
        if let Some(old) = replaced {
            // The slot freed by `take` always has room for the swapped item.
            let _ = member.inventory.add(old);
        }
        Ok(Outcome::new(format!("{} equips {item_name}", member.name)))
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Result<Outcome, ActionError> {
        let (id, _) = self.acting_member(0)?;
        let member = self
            .world
            .get_mut(id)
            .ok_or(ActionError::UnknownCombatant(id))?;
        if member.equipment.get(slot).is_none() {
            return Err(ActionError::EmptySlot(slot));
        }
        if member.inventory.is_full() {
            return Err(ActionError::InventoryFull);
        }
        let item = member.unequip(slot).ok_or(ActionError::EmptySlot(slot))?;
        let message = format!("{} unequips {}", member.name, item.name);
        let _ = member.inventory.add(item);
        Ok(Outcome::new(message))
    }

    /// Spends a skill point on any roster character.
    pub fn improve_skill(&mut self, character: EntityId, skill: Skill) -> Result<Outcome, ActionError> {
        if !self.party.in_roster(character) {
            return Err(ActionError::NotInRoster(character));
        }
        let member = self
            .world
            .get_mut(character)
            .ok_or(ActionError::UnknownCombatant(character))?;
        let level = member.improve_skill(skill)?;
        let message = format!("{} raises {skill} to level {level}", member.name);
        self.events.push(GameEvent::SkillImproved {
            combatant: character,
            skill,
            level,
        });
        Ok(Outcome::new(message))
    }
}
