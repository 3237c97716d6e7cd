//! Sortable items drawn for a level.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{LevelDefinition, SpecialMode};
use crate::category::Category;
use crate::constants::GOLDEN_ITEM_CHANCE;

/// A single piece of trash on the play field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub category: Category,
    pub token: String,
    pub id: u32,
    #[serde(default)]
    pub golden: bool,
}

impl Item {
    #[must_use]
    pub fn belongs_in(&self, bin: Category) -> bool {
        self.category == bin
    }
}

/// Generate the item set for `level`, in display order.
///
/// Tutorial levels distribute categories round-robin so every bin gets used;
/// later levels draw categories uniformly.
pub fn generate_items<R: Rng + ?Sized>(level: &LevelDefinition, rng: &mut R) -> Vec<Item> {
    let categories = &level.allowed_categories;
    if categories.is_empty() {
        return Vec::new();
    }
    let golden_level = level.special_mode == Some(SpecialMode::Golden);

    (0..level.item_count)
        .map(|id| {
            let category = if level.is_tutorial() {
                categories[id as usize % categories.len()]
            } else {
                categories[rng.gen_range(0..categories.len())]
            };
            let tokens = category.tokens();
            let token = tokens[rng.gen_range(0..tokens.len())].to_string();
            let golden = golden_level && rng.gen_bool(GOLDEN_ITEM_CHANCE);
            Item {
                category,
                token,
                id,
                golden,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LevelCatalog;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn tutorial_levels_distribute_round_robin() {
        let catalog = LevelCatalog::generate(3);
        let level = catalog.level(3).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let items = generate_items(level, &mut rng);

        assert_eq!(items.len(), 10);
        for (i, item) in items.iter().enumerate() {
            assert_eq!(item.id as usize, i);
            assert_eq!(item.category, level.allowed_categories[i % 4]);
            assert!(item.category.tokens().contains(&item.token.as_str()));
            assert!(!item.golden);
        }
    }

    #[test]
    fn later_levels_stay_within_allowed_categories() {
        let catalog = LevelCatalog::generate(3);
        let level = catalog.level(40).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(12);
        let items = generate_items(level, &mut rng);

        assert_eq!(items.len() as u32, level.item_count);
        assert!(
            items
                .iter()
                .all(|item| level.allowed_categories.contains(&item.category))
        );
    }

    #[test]
    fn golden_items_only_appear_on_golden_levels() {
        let catalog = LevelCatalog::generate(3);
        let golden_level = catalog.level(10).unwrap();
        let plain_level = catalog.level(9).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(13);

        let mut golden_seen = 0;
        for _ in 0..50 {
            golden_seen += generate_items(golden_level, &mut rng)
                .iter()
                .filter(|item| item.golden)
                .count();
            assert!(
                generate_items(plain_level, &mut rng)
                    .iter()
                    .all(|item| !item.golden)
            );
        }
        assert!(golden_seen > 0);
    }
}
