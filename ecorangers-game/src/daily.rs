//! Daily challenge: a shared date-derived level with streak time bonuses.
use crate::constants::{
    DAILY_LEVEL_BASE, DAILY_LEVEL_SPAN, DAILY_TIME_BONUS_FLOOR, DAILY_TIME_BONUS_START,
    MILLIS_PER_DAY,
};
use crate::state::SessionState;

/// Whole UTC days elapsed since the Unix epoch.
#[must_use]
pub const fn epoch_day(now_millis: u64) -> u64 {
    now_millis / MILLIS_PER_DAY
}

/// Challenge level for the UTC day containing `now_millis`, in `10..=60`.
#[must_use]
pub const fn daily_challenge_level(now_millis: u64) -> u8 {
    // The span keeps the offset below 51, so the narrowing cannot truncate.
    DAILY_LEVEL_BASE + (epoch_day(now_millis) % DAILY_LEVEL_SPAN) as u8
}

/// Seconds awarded by the `count`-th streak time bonus (zero-based).
#[must_use]
pub const fn time_bonus_seconds(count: u32) -> u32 {
    let remaining = DAILY_TIME_BONUS_START.saturating_sub(count);
    if remaining < DAILY_TIME_BONUS_FLOOR {
        DAILY_TIME_BONUS_FLOOR
    } else {
        remaining
    }
}

/// Grant the next streak time bonus, returning the seconds added.
pub fn apply_time_bonus(state: &mut SessionState) -> u32 {
    let seconds = time_bonus_seconds(state.time_bonus_count);
    state.time_left = state.time_left.plus(seconds);
    state.time_bonus_count = state.time_bonus_count.saturating_add(1);
    log::debug!(
        "daily challenge time bonus #{}: +{seconds}s at streak {}",
        state.time_bonus_count,
        state.streak
    );
    seconds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TimeLeft;

    #[test]
    fn level_is_stable_within_a_day() {
        let start_of_day = 20_000 * MILLIS_PER_DAY;
        let end_of_day = start_of_day + MILLIS_PER_DAY - 1;
        assert_eq!(
            daily_challenge_level(start_of_day),
            daily_challenge_level(end_of_day)
        );
        assert_eq!(daily_challenge_level(start_of_day), 10 + (20_000 % 51) as u8);
    }

    #[test]
    fn level_stays_in_range_across_a_full_cycle() {
        let levels: Vec<u8> = (0..200)
            .map(|day| daily_challenge_level(day * MILLIS_PER_DAY))
            .collect();
        assert!(levels.iter().all(|level| (10..=60).contains(level)));
        assert_eq!(levels[0], 10);
        assert_eq!(levels[50], 60);
        assert_eq!(levels[51], 10);
    }

    #[test]
    fn time_bonus_shrinks_to_one_second() {
        let awarded: Vec<u32> = (0..8).map(time_bonus_seconds).collect();
        assert_eq!(awarded, vec![5, 4, 3, 2, 1, 1, 1, 1]);
    }

    #[test]
    fn apply_time_bonus_extends_clock_and_counts() {
        let mut state = SessionState {
            time_left: TimeLeft::Finite(3),
            is_daily_challenge: true,
            ..SessionState::default()
        };
        let total: u32 = (0..6).map(|_| apply_time_bonus(&mut state)).sum();
        assert_eq!(total, 5 + 4 + 3 + 2 + 1 + 1);
        assert_eq!(state.time_left, TimeLeft::Finite(3 + total));
        assert_eq!(state.time_bonus_count, 6);
    }
}
