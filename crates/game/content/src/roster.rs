//! Built-in content used when no save or data file provides any.
use game_core::{
    Aggression, AiBehavior, Archetype, AttributeSet, Combatant, EntityId, Item, ItemKind,
    MapDefinition, MonsterCatalog, MonsterRewards, MonsterStats, MonsterTemplate, Position,
    WeaponCategory,
};

/// A starting character: who, what class and where it deploys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RosterEntry {
    pub name: &'static str,
    pub archetype: Archetype,
    pub position: Position,
}

pub const DEFAULT_ROSTER: [RosterEntry; 4] = [
    RosterEntry {
        name: "Thorin",
        archetype: Archetype::Warrior,
        position: Position::new(6, 6),
    },
    RosterEntry {
        name: "Zara",
        archetype: Archetype::Mage,
        position: Position::new(7, 6),
    },
    RosterEntry {
        name: "Shadow",
        archetype: Archetype::Rogue,
        position: Position::new(6, 7),
    },
    RosterEntry {
        name: "Aria",
        archetype: Archetype::Cleric,
        position: Position::new(7, 7),
    },
];

/// The first this many roster entries form the starting group.
pub const DEFAULT_GROUP_SIZE: usize = 3;

/// Level-1 characters for [`DEFAULT_ROSTER`], numbered from 1 and carrying
/// their deployment cell.
pub fn default_roster() -> Vec<Combatant> {
    DEFAULT_ROSTER
        .iter()
        .zip(1u32..)
        .map(|(entry, id)| {
            let mut character = Combatant::character(EntityId(id), entry.name, entry.archetype);
            character.position = Some(entry.position);
            character
        })
        .collect()
}

pub fn default_group(roster: &[Combatant]) -> Vec<EntityId> {
    roster
        .iter()
        .filter(|c| c.is_alive())
        .take(DEFAULT_GROUP_SIZE)
        .map(|c| c.id)
        .collect()
}

/// Walled 16x16 room, big enough for the default roster cells.
pub fn fallback_map() -> MapDefinition {
    MapDefinition::walled("fallback", 16, 16)
}

/// Single goblin entry so the spawner always has something to place.
pub fn fallback_catalog() -> MonsterCatalog {
    let mut catalog = MonsterCatalog::new();
    catalog.insert(
        "goblin",
        MonsterTemplate {
            name: "Goblin".to_string(),
            description: "A wiry scavenger that hunts in the dark.".to_string(),
            level: 1,
            attributes: AttributeSet::new(8, 12, 6, 6, 6, 6),
            stats: MonsterStats {
                max_hp: 12,
                attack: 4,
                defense: 2,
                ..MonsterStats::default()
            },
            ai: AiBehavior::Patrol,
            aggression: Aggression::Aggressive,
            rewards: MonsterRewards {
                experience: Some(10),
                gold: Some(5),
            },
            weapon: Some(Item::new("Rusty Knife", ItemKind::Weapon(WeaponCategory::Light))),
            loot_table: Vec::new(),
            drop_chance_percent: None,
            variants: vec!["Goblin Scout".to_string(), "Goblin Raider".to_string()],
        },
    );
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{GameConfig, GameEngine};

    #[test]
    fn default_roster_fits_the_fallback_map() {
        let roster = default_roster();
        let group = default_group(&roster);
        assert_eq!(roster.len(), 4);
        assert_eq!(group, vec![EntityId(1), EntityId(2), EntityId(3)]);

        let mut engine = GameEngine::with_roster(
            &fallback_map(),
            fallback_catalog(),
            GameConfig::default(),
            roster,
        )
        .expect("fallback map is valid");
        engine.set_group(&group).expect("default group is valid");

        let thorin = engine.combatant(EntityId(1)).expect("enlisted");
        assert_eq!(thorin.name, "Thorin");
        assert_eq!(thorin.position, Some(Position::new(6, 6)));
        assert!(engine.combatant(EntityId(4)).is_some_and(|c| c.position.is_none()));
        assert_eq!(engine.party().parked_at(EntityId(4)), Some(Position::new(7, 7)));
    }

    #[test]
    fn dead_characters_are_left_out_of_the_default_group() {
        let mut roster = default_roster();
        roster[0].hp.current = 0;
        assert_eq!(
            default_group(&roster),
            vec![EntityId(2), EntityId(3), EntityId(4)]
        );
    }

    #[test]
    fn fallback_catalog_is_never_empty() {
        let catalog = fallback_catalog();
        assert!(catalog.get("goblin").is_some());
        assert!(!catalog.is_empty());
    }
}
