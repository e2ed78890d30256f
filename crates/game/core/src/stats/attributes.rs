//! The six character attributes.
use strum::{Display, EnumIter, EnumString};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Attribute {
    #[strum(serialize = "BDY")]
    #[cfg_attr(feature = "serde", serde(rename = "BDY"))]
    Body,
    #[strum(serialize = "AGI")]
    #[cfg_attr(feature = "serde", serde(rename = "AGI"))]
    Agility,
    #[strum(serialize = "INT")]
    #[cfg_attr(feature = "serde", serde(rename = "INT"))]
    Intelligence,
    #[strum(serialize = "WIL")]
    #[cfg_attr(feature = "serde", serde(rename = "WIL"))]
    Willpower,
    #[strum(serialize = "GNO")]
    #[cfg_attr(feature = "serde", serde(rename = "GNO"))]
    Gnosis,
    #[strum(serialize = "SOL")]
    #[cfg_attr(feature = "serde", serde(rename = "SOL"))]
    Soul,
}

/// Attribute values of one combatant. Fixed after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeSet {
    #[cfg_attr(feature = "serde", serde(rename = "BDY"))]
    pub body: u32,
    #[cfg_attr(feature = "serde", serde(rename = "AGI"))]
    pub agility: u32,
    #[cfg_attr(feature = "serde", serde(rename = "INT"))]
    pub intelligence: u32,
    #[cfg_attr(feature = "serde", serde(rename = "WIL"))]
    pub willpower: u32,
    #[cfg_attr(feature = "serde", serde(rename = "GNO"))]
    pub gnosis: u32,
    #[cfg_attr(feature = "serde", serde(rename = "SOL"))]
    pub soul: u32,
}

impl AttributeSet {
    pub const DEFAULT_VALUE: u32 = 10;

    pub const fn new(
        body: u32,
        agility: u32,
        intelligence: u32,
        willpower: u32,
        gnosis: u32,
        soul: u32,
    ) -> Self {
        Self {
            body,
            agility,
            intelligence,
            willpower,
            gnosis,
            soul,
        }
    }

    pub const fn uniform(value: u32) -> Self {
        Self::new(value, value, value, value, value, value)
    }

    pub const fn get(&self, attribute: Attribute) -> u32 {
        match attribute {
            Attribute::Body => self.body,
            Attribute::Agility => self.agility,
            Attribute::Intelligence => self.intelligence,
            Attribute::Willpower => self.willpower,
            Attribute::Gnosis => self.gnosis,
            Attribute::Soul => self.soul,
        }
    }

    /// Size of the per-round reaction pool: half of Agility, rounded up.
    pub const fn max_reactions(&self) -> u32 {
        self.agility.div_ceil(2)
    }
}

impl Default for AttributeSet {
    fn default() -> Self {
        Self::uniform(Self::DEFAULT_VALUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn reactions_round_up() {
        assert_eq!(AttributeSet::new(10, 7, 10, 10, 10, 10).max_reactions(), 4);
        assert_eq!(AttributeSet::new(10, 8, 10, 10, 10, 10).max_reactions(), 4);
        assert_eq!(AttributeSet::uniform(0).max_reactions(), 0);
    }

    #[test]
    fn abbreviations_parse() {
        assert_eq!(Attribute::from_str("GNO"), Ok(Attribute::Gnosis));
        assert_eq!(Attribute::Soul.to_string(), "SOL");
    }
}
