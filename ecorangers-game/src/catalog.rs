//! Level catalog: fifteen hand-authored levels followed by seeded procedural ones.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hasher;
use twox_hash::XxHash64;

use crate::category::Category;
use crate::constants::{
    DIFFICULTY_MAX, GENERATED_ITEMS_BASE, GENERATED_ITEMS_CAP, GENERATED_ITEMS_JITTER_MAX,
    GENERATED_ITEMS_PER_DIFFICULTY, GENERATED_SPECIAL_CHANCE, GENERATED_SPECIAL_EVERY,
    GENERATED_TIME_BASE, GENERATED_TIME_FLOOR, HAND_AUTHORED_LEVELS, LEVEL_COUNT,
};
use crate::error::CatalogError;
use crate::seed::{CATALOG_STREAM, entropy_seed, stream_rng};

/// Per-level tag altering generation or presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecialMode {
    Gentle,
    Golden,
    Speed,
    TimePressure,
    SlowMotion,
    WaterTheme,
    Carnival,
    Combo,
    MegaSort,
    Rainbow,
    Mystery,
}

impl SpecialMode {
    /// Tags the procedural generator draws from.
    pub const GENERATED: [Self; 7] = [
        Self::Golden,
        Self::Speed,
        Self::TimePressure,
        Self::Combo,
        Self::MegaSort,
        Self::Rainbow,
        Self::Mystery,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gentle => "gentle",
            Self::Golden => "golden",
            Self::Speed => "speed",
            Self::TimePressure => "time-pressure",
            Self::SlowMotion => "slow-motion",
            Self::WaterTheme => "water-theme",
            Self::Carnival => "carnival",
            Self::Combo => "combo",
            Self::MegaSort => "mega-sort",
            Self::Rainbow => "rainbow",
            Self::Mystery => "mystery",
        }
    }

    /// Banner announced when a level with this tag starts, if any.
    #[must_use]
    pub const fn announcement(self) -> Option<&'static str> {
        match self {
            Self::Speed => Some("⚡ SPEED MODE ACTIVATED!"),
            Self::Golden => Some("💰 GOLDEN ITEMS APPEAR!"),
            Self::TimePressure => Some("⏰ TIME PRESSURE MODE!"),
            _ => None,
        }
    }
}

impl fmt::Display for SpecialMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable definition of a single level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub index: u8,
    pub location: String,
    pub description: String,
    pub background: String,
    pub item_count: u32,
    pub time_limit: u32,
    pub allowed_categories: Vec<Category>,
    #[serde(default)]
    pub special_mode: Option<SpecialMode>,
    #[serde(default)]
    pub decorative_animals: Vec<String>,
}

impl LevelDefinition {
    #[must_use]
    pub const fn is_tutorial(&self) -> bool {
        self.index <= crate::constants::TUTORIAL_LEVEL_MAX
    }

    /// Heading line shown above the play field.
    #[must_use]
    pub fn banner(&self) -> String {
        format!("{} - {}", self.location, self.description)
    }
}

struct AuthoredLevel {
    location: &'static str,
    description: &'static str,
    background: &'static str,
    items: u32,
    time: u32,
    categories: &'static [Category],
    special: Option<SpecialMode>,
    animals: [&'static str; 3],
}

struct GeneratedLocation {
    name: &'static str,
    background: &'static str,
    animals: [&'static str; 3],
}

use Category::{Electronic, Glass, Metal, Organic, Paper, Plastic};

const AUTHORED_LEVELS: [AuthoredLevel; HAND_AUTHORED_LEVELS] = [
    AuthoredLevel {
        location: "🏞️ Forest Park",
        description: "Learn to sort! Help clean this beautiful forest!",
        background: "linear-gradient(to bottom, #87CEEB 0%, #98FB98 70%, #90EE90 100%)",
        items: 6,
        time: 90,
        categories: &[Plastic, Paper],
        special: None,
        animals: ["🐻", "🦌", "🐿️"],
    },
    AuthoredLevel {
        location: "🌳 Nature Trail",
        description: "Great job! Now try with more items!",
        background: "linear-gradient(to bottom, #98FB98 0%, #90EE90 50%, #8FBC8F 100%)",
        items: 8,
        time: 85,
        categories: &[Plastic, Paper, Glass],
        special: None,
        animals: ["🦝", "🐸", "🦎"],
    },
    AuthoredLevel {
        location: "🌲 Pine Forest",
        description: "You're getting good at this!",
        background: "linear-gradient(to bottom, #228B22 0%, #32CD32 50%, #98FB98 100%)",
        items: 10,
        time: 80,
        categories: &[Plastic, Paper, Glass, Organic],
        special: None,
        animals: ["🐺", "🦉", "🐿️"],
    },
    AuthoredLevel {
        location: "🏖️ Sunny Beach",
        description: "Save the marine life!",
        background: "linear-gradient(to bottom, #87CEEB 0%, #F0E68C 50%, #DEB887 100%)",
        items: 12,
        time: 75,
        categories: &[Plastic, Glass, Organic],
        special: None,
        animals: ["🐠", "🦀", "🐙"],
    },
    AuthoredLevel {
        location: "🏔️ Mountain Peak",
        description: "Keep the mountains clean!",
        background: "linear-gradient(to bottom, #87CEEB 0%, #D3D3D3 50%, #F5F5F5 100%)",
        items: 14,
        time: 70,
        categories: &[Plastic, Paper, Glass, Organic],
        special: None,
        animals: ["🦅", "🐐", "🦌"],
    },
    AuthoredLevel {
        location: "🌆 City Park",
        description: "Urban cleanup mission!",
        background: "linear-gradient(to bottom, #87CEEB 0%, #98FB98 30%, #9ACD32 100%)",
        items: 16,
        time: 70,
        categories: &[Plastic, Paper, Glass, Organic, Electronic],
        special: None,
        animals: ["🐦", "🐿️", "🦆"],
    },
    AuthoredLevel {
        location: "🦋 Butterfly Garden",
        description: "Protect the butterflies!",
        background: "linear-gradient(to bottom, #FFB6C1 0%, #98FB98 50%, #DDA0DD 100%)",
        items: 14,
        time: 65,
        categories: &[Plastic, Paper, Organic],
        special: Some(SpecialMode::Gentle),
        animals: ["🦋", "🐝", "🐞"],
    },
    AuthoredLevel {
        location: "🌊 River Bank",
        description: "Clean water for everyone!",
        background: "linear-gradient(to bottom, #87CEEB 0%, #4682B4 50%, #5F9EA0 100%)",
        items: 18,
        time: 65,
        categories: &[Plastic, Glass, Organic, Metal],
        special: None,
        animals: ["🦆", "🐸", "🦢"],
    },
    AuthoredLevel {
        location: "🏕️ Camping Site",
        description: "Leave no trace behind!",
        background: "linear-gradient(to bottom, #8FBC8F 0%, #556B2F 50%, #6B8E23 100%)",
        items: 16,
        time: 60,
        categories: &[Plastic, Paper, Glass, Organic],
        special: None,
        animals: ["🦝", "🐻", "🦔"],
    },
    AuthoredLevel {
        location: "🌺 Tropical Beach",
        description: "Paradise needs protection!",
        background: "linear-gradient(to bottom, #00CED1 0%, #FFE4B5 50%, #F0E68C 100%)",
        items: 20,
        time: 60,
        categories: &[Plastic, Glass, Organic],
        special: Some(SpecialMode::Golden),
        animals: ["🦜", "🐠", "🦎"],
    },
    AuthoredLevel {
        location: "🏺 Ancient Ruins",
        description: "Preserve history!",
        background: "linear-gradient(to bottom, #F4A460 0%, #CD853F 50%, #D2B48C 100%)",
        items: 18,
        time: 55,
        categories: &[Plastic, Paper, Glass, Metal],
        special: Some(SpecialMode::Speed),
        animals: ["🦎", "🐍", "🦅"],
    },
    AuthoredLevel {
        location: "🌋 Volcano Base",
        description: "Hot cleanup mission!",
        background: "linear-gradient(to bottom, #FF4500 0%, #FF6347 50%, #CD853F 100%)",
        items: 22,
        time: 50,
        categories: &[Plastic, Glass, Metal],
        special: Some(SpecialMode::TimePressure),
        animals: ["🦎", "🐉", "🔥"],
    },
    AuthoredLevel {
        location: "❄️ Snowy Mountains",
        description: "Winter wonderland cleanup!",
        background: "linear-gradient(to bottom, #B0E0E6 0%, #F0F8FF 50%, #FFFAFA 100%)",
        items: 16,
        time: 65,
        categories: &[Plastic, Paper, Glass, Organic],
        special: Some(SpecialMode::SlowMotion),
        animals: ["🐧", "❄️", "🦌"],
    },
    AuthoredLevel {
        location: "🌵 Desert Oasis",
        description: "Every drop counts!",
        background: "linear-gradient(to bottom, #F4A460 0%, #DEB887 50%, #F5DEB3 100%)",
        items: 20,
        time: 45,
        categories: &[Plastic, Glass, Metal],
        special: Some(SpecialMode::WaterTheme),
        animals: ["🦎", "🐪", "🌵"],
    },
    AuthoredLevel {
        location: "🎡 Fun Fair",
        description: "Keep the fun clean!",
        background: "linear-gradient(to bottom, #FF69B4 0%, #FFB6C1 50%, #FFC0CB 100%)",
        items: 24,
        time: 55,
        categories: &[Plastic, Paper, Organic],
        special: Some(SpecialMode::Carnival),
        animals: ["🎪", "🎠", "🎈"],
    },
];

const GENERATED_LOCATIONS: [GeneratedLocation; 10] = [
    GeneratedLocation {
        name: "🏛️ Museum Garden",
        background: "linear-gradient(to bottom, #DDA0DD 0%, #DA70D6 50%, #BA55D3 100%)",
        animals: ["🦉", "📚", "🎨"],
    },
    GeneratedLocation {
        name: "🚢 Harbor Cleanup",
        background: "linear-gradient(to bottom, #4682B4 0%, #5F9EA0 50%, #708090 100%)",
        animals: ["⚓", "🐟", "🦭"],
    },
    GeneratedLocation {
        name: "🌸 Cherry Blossom Park",
        background: "linear-gradient(to bottom, #FFB6C1 0%, #FFC0CB 50%, #FFCCCB 100%)",
        animals: ["🌸", "🦋", "🐝"],
    },
    GeneratedLocation {
        name: "🏰 Castle Grounds",
        background: "linear-gradient(to bottom, #9370DB 0%, #8A2BE2 50%, #4B0082 100%)",
        animals: ["🦅", "👑", "🏰"],
    },
    GeneratedLocation {
        name: "🎋 Bamboo Forest",
        background: "linear-gradient(to bottom, #98FB98 0%, #90EE90 50%, #8FBC8F 100%)",
        animals: ["🐼", "🎋", "🦌"],
    },
    GeneratedLocation {
        name: "🌈 Rainbow Valley",
        background: "linear-gradient(45deg, #FF0000, #FF7F00, #FFFF00, #00FF00, #0000FF, #4B0082, #9400D3)",
        animals: ["🦄", "🌈", "🦋"],
    },
    GeneratedLocation {
        name: "🏔️ Alpine Meadow",
        background: "linear-gradient(to bottom, #87CEEB 0%, #98FB98 50%, #F0F8FF 100%)",
        animals: ["🐐", "🦅", "🌼"],
    },
    GeneratedLocation {
        name: "🎪 Circus Ground",
        background: "linear-gradient(45deg, #FF1493, #00BFFF, #FFD700, #FF69B4)",
        animals: ["🎪", "🤹", "🎭"],
    },
    GeneratedLocation {
        name: "🦕 Dinosaur Park",
        background: "linear-gradient(to bottom, #8FBC8F 0%, #556B2F 50%, #9ACD32 100%)",
        animals: ["🦕", "🦖", "🌿"],
    },
    GeneratedLocation {
        name: "🚀 Space Center",
        background: "linear-gradient(to bottom, #191970 0%, #4169E1 50%, #87CEEB 100%)",
        animals: ["🚀", "👨‍🚀", "🌟"],
    },
];

const BASIC_CATEGORIES: [Category; 4] = [Plastic, Paper, Glass, Organic];
const WIDE_CATEGORIES: [Category; 5] = [Plastic, Paper, Glass, Organic, Electronic];
const FULL_CATEGORIES: [Category; 6] = [Plastic, Paper, Glass, Organic, Electronic, Metal];

/// Difficulty tier for a zero-based catalog position.
#[must_use]
pub fn difficulty_for(position: usize) -> u32 {
    let tier = u32::try_from(position / 10).unwrap_or(u32::MAX);
    tier.saturating_add(1).min(DIFFICULTY_MAX)
}

/// Categories available at the given difficulty tier.
#[must_use]
pub fn categories_for(difficulty: u32) -> &'static [Category] {
    match difficulty {
        0 | 1 => &BASIC_CATEGORIES,
        2 => &WIDE_CATEGORIES,
        _ => &FULL_CATEGORIES,
    }
}

/// Time limit for a generated zero-based catalog position.
#[must_use]
pub fn generated_time_limit(position: usize) -> u32 {
    let decay = u32::try_from(position / 5).unwrap_or(u32::MAX);
    GENERATED_TIME_BASE
        .saturating_sub(decay)
        .max(GENERATED_TIME_FLOOR)
}

fn authored(position: usize, level: &AuthoredLevel) -> LevelDefinition {
    LevelDefinition {
        index: level_number(position),
        location: level.location.to_string(),
        description: level.description.to_string(),
        background: level.background.to_string(),
        item_count: level.items,
        time_limit: level.time,
        allowed_categories: level.categories.to_vec(),
        special_mode: level.special,
        decorative_animals: level.animals.iter().map(ToString::to_string).collect(),
    }
}

fn generated<R: Rng>(position: usize, rng: &mut R) -> LevelDefinition {
    let location = &GENERATED_LOCATIONS[position % GENERATED_LOCATIONS.len()];
    let difficulty = difficulty_for(position);
    let is_special = position > 2
        && (position % GENERATED_SPECIAL_EVERY == 0 || rng.gen_bool(GENERATED_SPECIAL_CHANCE));
    let jitter = rng.gen_range(0..=GENERATED_ITEMS_JITTER_MAX);
    let item_count = (GENERATED_ITEMS_BASE + difficulty * GENERATED_ITEMS_PER_DIFFICULTY + jitter)
        .min(GENERATED_ITEMS_CAP);
    let special_mode = is_special
        .then(|| SpecialMode::GENERATED[rng.gen_range(0..SpecialMode::GENERATED.len())]);

    LevelDefinition {
        index: level_number(position),
        location: location.name.to_string(),
        description: format!("Level {} Challenge!", position + 1),
        background: location.background.to_string(),
        item_count,
        time_limit: generated_time_limit(position),
        allowed_categories: categories_for(difficulty).to_vec(),
        special_mode,
        decorative_animals: location.animals.iter().map(ToString::to_string).collect(),
    }
}

fn level_number(position: usize) -> u8 {
    u8::try_from(position + 1).unwrap_or(LEVEL_COUNT)
}

/// Read-only table of all level definitions, built once per process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCatalog {
    seed: u64,
    levels: Vec<LevelDefinition>,
}

impl LevelCatalog {
    /// Build the catalog; procedural levels are drawn from `seed`.
    #[must_use]
    pub fn generate(seed: u64) -> Self {
        let mut rng = stream_rng(seed, CATALOG_STREAM);
        let levels = (0..usize::from(LEVEL_COUNT))
            .map(|position| match AUTHORED_LEVELS.get(position) {
                Some(level) => authored(position, level),
                None => generated(position, &mut rng),
            })
            .collect();
        log::debug!("generated level catalog from seed {seed:#x}");
        Self { seed, levels }
    }

    /// Build the catalog from a fresh entropy seed; layouts differ per run.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::generate(entropy_seed())
    }

    /// Look up the definition for a one-based level number.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::OutOfRange`] when `index` is outside `1..=100`.
    pub fn level(&self, index: u32) -> Result<&LevelDefinition, CatalogError> {
        let position = index
            .checked_sub(1)
            .and_then(|p| usize::try_from(p).ok())
            .ok_or(CatalogError::OutOfRange { index })?;
        self.levels
            .get(position)
            .ok_or(CatalogError::OutOfRange { index })
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDefinition> {
        self.levels.iter()
    }

    /// Stable digest of the catalog contents, for comparing generated layouts.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let canonical = serde_json::to_vec(&self.levels).unwrap_or_default();
        let mut hasher = XxHash64::with_seed(0);
        hasher.write(&canonical);
        hasher.finish()
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_rejects_out_of_range_levels() {
        let catalog = LevelCatalog::generate(1);
        assert_eq!(catalog.len(), 100);
        assert_eq!(
            catalog.level(0).unwrap_err(),
            CatalogError::OutOfRange { index: 0 }
        );
        assert_eq!(
            catalog.level(101).unwrap_err(),
            CatalogError::OutOfRange { index: 101 }
        );
        assert_eq!(catalog.level(1).unwrap().index, 1);
        assert_eq!(catalog.level(100).unwrap().index, 100);
    }

    #[test]
    fn authored_levels_are_fixed_across_seeds() {
        let a = LevelCatalog::generate(1);
        let b = LevelCatalog::generate(2);
        for index in 1..=15 {
            assert_eq!(a.level(index).unwrap(), b.level(index).unwrap());
        }
        let tropical = a.level(10).unwrap();
        assert_eq!(tropical.special_mode, Some(SpecialMode::Golden));
        assert_eq!(tropical.item_count, 20);
        assert_eq!(a.level(1).unwrap().allowed_categories, vec![Plastic, Paper]);
    }

    #[test]
    fn generated_levels_follow_difficulty_rules() {
        let catalog = LevelCatalog::generate(0xC0FFEE);
        for level in catalog.iter().skip(HAND_AUTHORED_LEVELS) {
            let position = usize::from(level.index) - 1;
            let difficulty = difficulty_for(position);
            let floor = GENERATED_ITEMS_BASE + difficulty * GENERATED_ITEMS_PER_DIFFICULTY;
            assert!(level.item_count >= floor.min(GENERATED_ITEMS_CAP));
            assert!(level.item_count <= (floor + 4).min(GENERATED_ITEMS_CAP));
            assert_eq!(level.time_limit, generated_time_limit(position));
            assert!(level.time_limit >= 30);
            assert_eq!(level.allowed_categories, categories_for(difficulty));
            if position % 5 == 0 {
                let special = level.special_mode.expect("every fifth level is special");
                assert!(SpecialMode::GENERATED.contains(&special));
            }
        }
    }

    #[test]
    fn difficulty_tiers_widen_categories() {
        assert_eq!(difficulty_for(15), 2);
        assert_eq!(difficulty_for(99), 8);
        assert_eq!(categories_for(1).len(), 4);
        assert_eq!(categories_for(2).len(), 5);
        assert_eq!(categories_for(3).len(), 6);
        assert_eq!(generated_time_limit(15), 42);
        assert_eq!(generated_time_limit(99), 30);
    }

    #[test]
    fn same_seed_reproduces_catalog() {
        let a = LevelCatalog::generate(99);
        let b = LevelCatalog::generate(99);
        assert_eq!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.seed(), 99);
    }

    #[test]
    fn every_level_satisfies_invariants() {
        let catalog = LevelCatalog::generate(5);
        for level in catalog.iter() {
            assert!(level.item_count >= 1);
            assert!(level.time_limit > 0);
            assert!(!level.allowed_categories.is_empty());
            assert!(level.banner().contains(&level.location));
        }
    }
}
