//! Monster catalog loader.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use game_core::{MonsterCatalog, MonsterTemplate};

use crate::loaders::{LoadResult, read_file};

/// Loads `monsters.ron`: a map from monster type to template. Every template
/// field is optional and falls back to the default template's value.
pub struct MonsterLoader;

impl MonsterLoader {
    pub fn load(path: &Path) -> LoadResult<MonsterCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse monster catalog {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<MonsterCatalog> {
        let monsters: BTreeMap<String, MonsterTemplate> = ron::from_str(content)?;
        Ok(MonsterCatalog { monsters })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{AiBehavior, ItemKind, WeaponCategory};

    const CATALOG: &str = r#"{
        "skeleton_archer": (
            name: "Skeleton Archer",
            level: 2,
            ai: guard,
            stats: (max_hp: 14, attack_range: 4, vision_range: 5),
            weapon: Some((name: "Bone Bow", kind: weapon(ranged(range: 4)))),
            variants: ["Rattling Archer"],
        ),
        "rat": (name: "Rat"),
    }"#;

    #[test]
    fn omitted_fields_use_template_defaults() {
        let catalog = MonsterLoader::parse(CATALOG).expect("valid ron");

        let archer = catalog.get("skeleton_archer").expect("listed");
        assert_eq!(archer.level, 2);
        assert_eq!(archer.ai, AiBehavior::Guard);
        assert_eq!(archer.stats.attack_range, 4);
        assert_eq!(archer.stats.max_action_points, 3);
        assert_eq!(
            archer.weapon.as_ref().map(|w| w.kind),
            Some(ItemKind::Weapon(WeaponCategory::Ranged { range: 4 }))
        );

        let rat = catalog.get("rat").expect("listed");
        assert_eq!(rat.experience_value(), 10);
        assert_eq!(rat.stats.sound_range, 6);
    }

    #[test]
    fn malformed_catalog_is_an_error() {
        assert!(MonsterLoader::parse("{ \"rat\": (level: \"high\") }").is_err());
    }
}
