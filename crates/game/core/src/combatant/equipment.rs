//! Items and equipment slots.
use super::StatusEffect;

/// Weapon family; decides which skill an attack rolls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WeaponCategory {
    Heavy,
    Light,
    /// Needs range and line of sight; `range` in cells.
    Ranged { range: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ItemKind {
    Weapon(WeaponCategory),
    Shield,
    Armor,
    Consumable,
    Treasure,
}

/// Flat stat bonus granted while an item is equipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatBonus {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
}

impl StatBonus {
    pub const NONE: StatBonus = StatBonus {
        hp: 0,
        attack: 0,
        defense: 0,
    };

    fn add(self, other: StatBonus) -> StatBonus {
        StatBonus {
            hp: self.hp + other.hp,
            attack: self.attack + other.attack,
            defense: self.defense + other.defense,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub name: String,
    pub kind: ItemKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bonus: StatBonus,
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: u32,
    /// Applied to the user when a consumable is used.
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect: Option<StatusEffect>,
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            kind,
            bonus: StatBonus::NONE,
            value: 0,
            effect: None,
        }
    }

    pub fn with_bonus(mut self, bonus: StatBonus) -> Self {
        self.bonus = bonus;
        self
    }

    pub fn with_effect(mut self, effect: StatusEffect) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn slot(&self) -> Option<EquipmentSlot> {
        match self.kind {
            ItemKind::Weapon(_) => Some(EquipmentSlot::Weapon),
            ItemKind::Shield => Some(EquipmentSlot::Shield),
            ItemKind::Armor => Some(EquipmentSlot::Armor),
            ItemKind::Consumable | ItemKind::Treasure => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum EquipmentSlot {
    Weapon,
    Shield,
    Armor,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Equipment {
    pub weapon: Option<Item>,
    pub shield: Option<Item>,
    pub armor: Option<Item>,
}

impl Equipment {
    pub fn get(&self, slot: EquipmentSlot) -> Option<&Item> {
        match slot {
            EquipmentSlot::Weapon => self.weapon.as_ref(),
            EquipmentSlot::Shield => self.shield.as_ref(),
            EquipmentSlot::Armor => self.armor.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: EquipmentSlot) -> &mut Option<Item> {
        match slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Shield => &mut self.shield,
            EquipmentSlot::Armor => &mut self.armor,
        }
    }

    /// Puts `item` into its slot and hands back whatever was there.
    /// Items without a slot are returned untouched as `Err`.
    pub fn equip(&mut self, item: Item) -> Result<Option<Item>, Item> {
        match item.slot() {
            Some(slot) => Ok(self.slot_mut(slot).replace(item)),
            None => Err(item),
        }
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<Item> {
        self.slot_mut(slot).take()
    }

    pub fn weapon_category(&self) -> Option<WeaponCategory> {
        match self.weapon.as_ref()?.kind {
            ItemKind::Weapon(category) => Some(category),
            _ => None,
        }
    }

    pub fn has_shield(&self) -> bool {
        self.shield.is_some()
    }

    /// Sum of all equipped bonuses.
    pub fn bonus(&self) -> StatBonus {
        [&self.weapon, &self.shield, &self.armor]
            .into_iter()
            .flatten()
            .fold(StatBonus::NONE, |acc, item| acc.add(item.bonus))
    }
}
