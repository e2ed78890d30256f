use arrayvec::ArrayVec;

use super::Item;
use crate::config::GameConfig;

/// Carried items, bounded at [`GameConfig::MAX_INVENTORY_SLOTS`].
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Inventory {
    items: ArrayVec<Item, { GameConfig::MAX_INVENTORY_SLOTS }>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.is_full()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Stores the item, handing it back when every slot is taken.
    pub fn add(&mut self, item: Item) -> Result<(), Item> {
        self.items.try_push(item).map_err(|err| err.element())
    }

    pub fn take(&mut self, index: usize) -> Option<Item> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }
}
