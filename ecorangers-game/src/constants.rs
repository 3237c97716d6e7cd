//! Centralized balance and tuning constants for Eco Rangers game logic.
//!
//! Level generation, scoring, clock and daily challenge numbers.

// Catalog -----------------------------------------------------------------
pub const LEVEL_COUNT: u8 = 100;
pub(crate) const HAND_AUTHORED_LEVELS: usize = 15;
pub(crate) const TUTORIAL_LEVEL_MAX: u8 = 3;
pub(crate) const DIFFICULTY_MAX: u32 = 8;
pub(crate) const GENERATED_ITEMS_BASE: u32 = 8;
pub(crate) const GENERATED_ITEMS_PER_DIFFICULTY: u32 = 3;
pub(crate) const GENERATED_ITEMS_JITTER_MAX: u32 = 4;
pub(crate) const GENERATED_ITEMS_CAP: u32 = 30;
pub(crate) const GENERATED_TIME_BASE: u32 = 45;
pub(crate) const GENERATED_TIME_FLOOR: u32 = 30;
pub(crate) const GENERATED_SPECIAL_CHANCE: f64 = 0.3;
pub(crate) const GENERATED_SPECIAL_EVERY: usize = 5;
pub(crate) const GOLDEN_ITEM_CHANCE: f64 = 0.15;

// Scoring -----------------------------------------------------------------
pub(crate) const BASE_POINTS_PER_LEVEL: u64 = 10;
pub(crate) const GOLDEN_BASE_MULTIPLIER: u64 = 2;
pub(crate) const STREAK_BONUS_STEP: u32 = 3;
pub(crate) const STREAK_BONUS_POINTS: u64 = 5;
pub(crate) const QUICK_SORT_THRESHOLD_SECS: u32 = 30;
pub(crate) const QUICK_SORT_BONUS: u64 = 5;
pub(crate) const STREAK_MILESTONE: u32 = 5;
pub(crate) const END_TIME_BONUS_PER_SEC: u64 = 3;
pub(crate) const END_STREAK_BONUS_PER_STEP: u64 = 20;
pub(crate) const PERFECT_CLEANUP_BONUS: u64 = 100;
pub(crate) const MAX_STREAK_ACHIEVEMENT: u32 = 5;

// Modes -------------------------------------------------------------------
pub(crate) const TIME_ATTACK_REDUCTION_SECS: u32 = 20;
pub(crate) const TIME_ATTACK_FLOOR_SECS: u32 = 30;
pub(crate) const HURRY_WARNING_SECS: u32 = 10;

// Daily challenge ---------------------------------------------------------
pub const MILLIS_PER_DAY: u64 = 86_400_000;
pub(crate) const DAILY_LEVEL_BASE: u8 = 10;
pub(crate) const DAILY_LEVEL_SPAN: u64 = 51;
pub(crate) const DAILY_TIME_BONUS_START: u32 = 5;
pub(crate) const DAILY_TIME_BONUS_FLOOR: u32 = 1;
