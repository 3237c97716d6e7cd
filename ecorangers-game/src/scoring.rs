//! Scoring engine: points for each sort and the end-of-level bonus.
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::constants::{
    BASE_POINTS_PER_LEVEL, END_STREAK_BONUS_PER_STEP, END_TIME_BONUS_PER_SEC,
    GOLDEN_BASE_MULTIPLIER, PERFECT_CLEANUP_BONUS, QUICK_SORT_BONUS, QUICK_SORT_THRESHOLD_SECS,
    STREAK_BONUS_POINTS, STREAK_BONUS_STEP, STREAK_MILESTONE,
};
use crate::daily::apply_time_bonus;
use crate::items::Item;
use crate::state::SessionState;

/// Point breakdown for a single correct sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortScore {
    pub base: u64,
    pub golden: u64,
    pub streak: u64,
    pub time: u64,
    pub multiplier: u32,
}

impl SortScore {
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.base
            .saturating_add(self.golden)
            .saturating_add(self.streak)
            .saturating_add(self.time)
            .saturating_mul(self.multiplier as u64)
    }
}

/// Bonus credited when a level ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LevelBonus {
    pub time: u64,
    pub streak: u64,
    pub perfect: u64,
}

impl LevelBonus {
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.time.saturating_add(self.streak).saturating_add(self.perfect)
    }
}

/// Result of dropping an item onto a bin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortOutcome {
    Correct {
        item: Item,
        score: SortScore,
        /// Streak reached a positive multiple of five.
        milestone: bool,
        /// Seconds granted by the daily-challenge streak bonus.
        time_bonus: Option<u32>,
        level_cleared: bool,
    },
    Incorrect {
        item_id: u32,
        bin: Category,
    },
    /// The item was already sorted; nothing changed.
    Missing { item_id: u32 },
}

impl SortOutcome {
    #[must_use]
    pub const fn is_correct(&self) -> bool {
        matches!(self, Self::Correct { .. })
    }

    #[must_use]
    pub const fn points(&self) -> u64 {
        match self {
            Self::Correct { score, .. } => score.total(),
            _ => 0,
        }
    }
}

/// Points a correct sort of `item` is worth in the current state.
///
/// The streak bonus uses the streak before this sort is counted.
#[must_use]
pub fn score_correct_sort(state: &SessionState, item: &Item) -> SortScore {
    let base = BASE_POINTS_PER_LEVEL * u64::from(state.level);
    let golden = if item.golden {
        base * GOLDEN_BASE_MULTIPLIER
    } else {
        0
    };
    let streak = u64::from(state.streak / STREAK_BONUS_STEP) * STREAK_BONUS_POINTS;
    let time = if state.time_left.exceeds(QUICK_SORT_THRESHOLD_SECS) {
        QUICK_SORT_BONUS
    } else {
        0
    };
    SortScore {
        base,
        golden,
        streak,
        time,
        multiplier: state.combo_multiplier.max(1),
    }
}

#[must_use]
pub const fn is_streak_milestone(streak: u32) -> bool {
    streak > 0 && streak % STREAK_MILESTONE == 0
}

/// Drop item `item_id` onto `bin`, applying every scoring side effect.
pub fn score_sort(state: &mut SessionState, item_id: u32, bin: Category) -> SortOutcome {
    let Some(candidate) = state.item(item_id) else {
        return SortOutcome::Missing { item_id };
    };

    if !candidate.belongs_in(bin) {
        state.break_streak();
        return SortOutcome::Incorrect { item_id, bin };
    }

    let score = score_correct_sort(state, candidate);
    let Some(item) = state.take_item(item_id) else {
        return SortOutcome::Missing { item_id };
    };
    state.score = state.score.saturating_add(score.total());
    state.extend_streak();
    state.items_collected = state.items_collected.saturating_add(1).min(state.total_items);

    let milestone = is_streak_milestone(state.streak);
    let time_bonus = (milestone && state.is_daily_challenge).then(|| apply_time_bonus(state));

    SortOutcome::Correct {
        item,
        score,
        milestone,
        time_bonus,
        level_cleared: state.current_items.is_empty(),
    }
}

/// Bonus earned for the level just finished.
#[must_use]
pub fn level_bonus(state: &SessionState) -> LevelBonus {
    LevelBonus {
        time: u64::from(state.time_left.bonus_seconds()) * END_TIME_BONUS_PER_SEC,
        streak: u64::from(state.max_streak) * END_STREAK_BONUS_PER_STEP,
        perfect: if state.is_perfect() {
            PERFECT_CLEANUP_BONUS
        } else {
            0
        },
    }
}
