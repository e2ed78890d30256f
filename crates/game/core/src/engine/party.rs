//! Roster, active group and the active-member cursor.
use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use super::{ActionError, GameEngine};
use crate::combatant::Combatant;
use crate::config::GameConfig;
use crate::events::GameEvent;
use crate::state::{EntityId, Position};
use crate::stats::Archetype;

pub type Group = ArrayVec<EntityId, { GameConfig::MAX_PARTY_SIZE }>;

/// Every player character plus the ordered group under control.
///
/// Turn order is group order. Group members stand on the map; the rest of the
/// roster is benched and remembers where it left the map.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Party {
    roster: Vec<EntityId>,
    group: Group,
    active: usize,
    parked: BTreeMap<EntityId, Position>,
}

impl Party {
    pub fn roster(&self) -> &[EntityId] {
        &self.roster
    }

    pub fn group(&self) -> &[EntityId] {
        &self.group
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> Option<EntityId> {
        self.group.get(self.active).copied()
    }

    pub fn in_roster(&self, id: EntityId) -> bool {
        self.roster.contains(&id)
    }

    pub fn in_group(&self, id: EntityId) -> bool {
        self.group.contains(&id)
    }

    pub fn parked_at(&self, id: EntityId) -> Option<Position> {
        self.parked.get(&id).copied()
    }

    fn enlist(&mut self, id: EntityId) {
        if !self.in_roster(id) {
            self.roster.push(id);
        }
    }

    fn join(&mut self, id: EntityId) -> Result<(), ActionError> {
        if self.in_group(id) {
            return Ok(());
        }
        self.group.try_push(id).map_err(|_| ActionError::PartyFull)
    }

    /// Removes a member and keeps the cursor on the same character when it
    /// survives the removal.
    fn leave(&mut self, id: EntityId) -> bool {
        let Some(index) = self.group.iter().position(|member| *member == id) else {
            return false;
        };
        self.group.remove(index);
        if index < self.active {
            self.active -= 1;
        }
        if self.active >= self.group.len() {
            self.active = 0;
        }
        true
    }

    fn set_active(&mut self, index: usize) -> Result<EntityId, ActionError> {
        let id = self
            .group
            .get(index)
            .copied()
            .ok_or(ActionError::InvalidIndex(index))?;
        self.active = index;
        Ok(id)
    }

    fn park(&mut self, id: EntityId, position: Position) {
        self.parked.insert(id, position);
    }

    fn unpark(&mut self, id: EntityId) -> Option<Position> {
        self.parked.remove(&id)
    }
}

impl GameEngine {
    pub fn party(&self) -> &Party {
        &self.party
    }

    /// Adds a character to the roster. A stored position is remembered as the
    /// cell it deploys to; the character stays benched until it joins the group.
    pub fn enlist(&mut self, mut character: Combatant) -> EntityId {
        let id = character.id;
        if let Some(position) = character.position.take() {
            self.party.park(id, position);
        }
        self.world.insert(character);
        self.party.enlist(id);
        id
    }

    /// Creates a level-1 character and adds it to the group when there is room.
    pub fn create_character(&mut self, name: &str, archetype: Archetype) -> Result<EntityId, ActionError> {
        let id = self.world.allocate_id();
        let mut character = Combatant::character(id, name, archetype);
        character.position = self.deployment_cell(id);
        self.enlist(character);
        tracing::info!(target: "game::engine", character = %id, name, %archetype, "character created");

        if self.party.group().len() < GameConfig::MAX_PARTY_SIZE {
            self.deploy(id)?;
            self.party.join(id)?;
            let index = self.party.group().len() - 1;
            self.emit_group_changed();
            self.switch_active(index)?;
        }
        Ok(id)
    }

    pub fn switch_active(&mut self, index: usize) -> Result<EntityId, ActionError> {
        let id = self.party.set_active(index)?;
        self.events.push(GameEvent::ActiveChanged { combatant: id });
        Ok(id)
    }

    pub fn next_member(&mut self) -> Option<EntityId> {
        self.cycle_active(true)
    }

    pub fn previous_member(&mut self) -> Option<EntityId> {
        self.cycle_active(false)
    }

    fn cycle_active(&mut self, forward: bool) -> Option<EntityId> {
        let len = self.party.group().len();
        if len <= 1 {
            return self.party.active();
        }
        let current = self.party.active_index();
        let index = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.switch_active(index).ok()
    }

    /// Moves a roster character into or out of the group. Returns whether the
    /// character is in the group afterwards.
    pub fn toggle_group_member(&mut self, id: EntityId) -> Result<bool, ActionError> {
        if !self.party.in_roster(id) {
            return Err(ActionError::NotInRoster(id));
        }
        if self.party.in_group(id) {
            self.bench(id);
            self.emit_group_changed();
            return Ok(false);
        }
        if self.party.group().len() >= GameConfig::MAX_PARTY_SIZE {
            return Err(ActionError::PartyFull);
        }
        self.check_deployable(id)?;
        self.deploy(id)?;
        self.party.join(id)?;
        self.emit_group_changed();
        Ok(true)
    }

    /// Replaces the whole group. Validation happens before anything moves.
    pub fn set_group(&mut self, members: &[EntityId]) -> Result<(), ActionError> {
        if members.len() > GameConfig::MAX_PARTY_SIZE {
            return Err(ActionError::GroupTooLarge {
                max: GameConfig::MAX_PARTY_SIZE,
            });
        }
        for (index, id) in members.iter().enumerate() {
            if !self.party.in_roster(*id) {
                return Err(ActionError::NotInRoster(*id));
            }
            if members[..index].contains(id) {
                return Err(ActionError::DuplicateMember(*id));
            }
            self.check_deployable(*id)?;
        }

        for id in self.party.group().to_vec() {
            self.bench(id);
        }
        for id in members {
            self.deploy(*id)?;
            self.party.join(*id)?;
        }
        self.emit_group_changed();
        if !members.is_empty() {
            self.switch_active(0)?;
        }
        Ok(())
    }

    /// Roster characters with benched ones carrying their parked cell, ready
    /// to be stored and handed back to [`GameEngine::enlist`].
    pub fn roster_snapshot(&self) -> Vec<Combatant> {
        self.party
            .roster()
            .iter()
            .filter_map(|id| self.world.get(*id))
            .map(|character| {
                let mut character = character.clone();
                if character.position.is_none() {
                    character.position = self.party.parked_at(character.id);
                }
                character
            })
            .collect()
    }

    fn check_deployable(&self, id: EntityId) -> Result<(), ActionError> {
        let character = self.world.get(id).ok_or(ActionError::UnknownCombatant(id))?;
        if !character.is_alive() {
            return Err(ActionError::ActorDead {
                name: character.name.clone(),
            });
        }
        Ok(())
    }

    fn bench(&mut self, id: EntityId) {
        if let Some(position) = self.world.remove_from_map(id) {
            self.party.park(id, position);
        }
        self.party.leave(id);
    }

    /// Puts a character on the map at its parked cell, or the closest free
    /// cell when that one cannot take it.
    fn deploy(&mut self, id: EntityId) -> Result<(), ActionError> {
        if self.world.get(id).and_then(|c| c.position).is_some() {
            return Ok(());
        }
        if let Some(parked) = self.party.unpark(id)
            && self.world.place(id, parked).is_ok()
        {
            return Ok(());
        }
        let cell = self
            .deployment_cell(id)
            .ok_or(ActionError::NoDeploymentCell(id))?;
        self.world
            .place(id, cell)
            .map_err(|_| ActionError::NoDeploymentCell(id))
    }

    /// Closest walkable cell with room to the active member, or to the spawn
    /// point when nobody is deployed.
    fn deployment_cell(&self, id: EntityId) -> Option<Position> {
        let anchor = self
            .party
            .active()
            .filter(|active| *active != id)
            .and_then(|active| self.world.get(active))
            .and_then(|c| c.position)
            .or(self.world.map().spawn_point())
            .unwrap_or(Position::ORIGIN);
        let map = self.world.map();
        map.positions()
            .filter(|pos| map.is_walkable(*pos))
            .min_by_key(|pos| pos.manhattan(anchor))
    }

    fn emit_group_changed(&mut self) {
        let members = self.party.group().to_vec();
        tracing::debug!(target: "game::engine", ?members, "group changed");
        self.events.push(GameEvent::GroupChanged { members });
    }
}
