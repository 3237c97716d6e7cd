//! Level completion summary and achievements
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::MAX_STREAK_ACHIEVEMENT;
use crate::scoring::LevelBonus;
use crate::state::{GameMode, SessionState};

/// Badges awarded on the level-complete screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    /// Max streak of at least five during the level
    MaxStreak(u32),
    /// Every item on the field was sorted
    PerfectCleanup,
    /// Level finished in zen mode
    ZenMaster,
    /// Level finished in time attack
    SpeedDemon,
    /// Level finished as the daily challenge
    DailyChampion,
    /// Streak time bonuses earned during the daily challenge
    TimeMaster(u32),
}

impl fmt::Display for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Achievement::MaxStreak(streak) => write!(f, "🔥 Max Streak: {streak}"),
            Achievement::PerfectCleanup => write!(f, "💯 Perfect Clean-up!"),
            Achievement::ZenMaster => write!(f, "🧘 Zen Master!"),
            Achievement::SpeedDemon => write!(f, "⚡ Speed Demon!"),
            Achievement::DailyChampion => write!(f, "🏆 Daily Champion!"),
            Achievement::TimeMaster(1) => write!(f, "⏰ Time Master: 1 bonus!"),
            Achievement::TimeMaster(count) => write!(f, "⏰ Time Master: {count} bonuses!"),
        }
    }
}

/// Everything the level-complete screen needs to display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub level: u8,
    pub mode: GameMode,
    pub bonus: LevelBonus,
    pub score: u64,
    pub max_streak: u32,
    pub items_collected: u32,
    pub total_items: u32,
    pub is_final_level: bool,
    pub achievements: Vec<Achievement>,
}

impl LevelSummary {
    /// Build the summary after `bonus` has been credited to `state`.
    #[must_use]
    pub fn from_state(state: &SessionState, bonus: LevelBonus) -> Self {
        Self {
            level: state.level,
            mode: state.mode,
            bonus,
            score: state.score,
            max_streak: state.max_streak,
            items_collected: state.items_collected,
            total_items: state.total_items,
            is_final_level: state.is_final_level(),
            achievements: achievements(state),
        }
    }

    /// Caption for the continue button.
    #[must_use]
    pub const fn next_label(&self) -> &'static str {
        if self.is_final_level {
            "🏆 GAME COMPLETE!"
        } else {
            "🌟 NEXT ADVENTURE"
        }
    }
}

/// Achievements earned by the level that just ended, in display order.
#[must_use]
pub fn achievements(state: &SessionState) -> Vec<Achievement> {
    let mut earned = Vec::new();
    if state.max_streak >= MAX_STREAK_ACHIEVEMENT {
        earned.push(Achievement::MaxStreak(state.max_streak));
    }
    if state.is_perfect() {
        earned.push(Achievement::PerfectCleanup);
    }
    match state.mode {
        GameMode::Zen => earned.push(Achievement::ZenMaster),
        GameMode::TimeAttack => earned.push(Achievement::SpeedDemon),
        GameMode::Adventure | GameMode::Challenge => {}
    }
    if state.is_daily_challenge {
        earned.push(Achievement::DailyChampion);
        if state.time_bonus_count > 0 {
            earned.push(Achievement::TimeMaster(state.time_bonus_count));
        }
    }
    earned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_challenge_perfect_run_collects_badges() {
        let state = SessionState {
            mode: GameMode::Challenge,
            is_daily_challenge: true,
            time_bonus_count: 2,
            max_streak: 12,
            items_collected: 12,
            total_items: 12,
            ..SessionState::default()
        };
        assert_eq!(
            achievements(&state),
            vec![
                Achievement::MaxStreak(12),
                Achievement::PerfectCleanup,
                Achievement::DailyChampion,
                Achievement::TimeMaster(2),
            ]
        );
        assert_eq!(Achievement::TimeMaster(2).to_string(), "⏰ Time Master: 2 bonuses!");
        assert_eq!(Achievement::TimeMaster(1).to_string(), "⏰ Time Master: 1 bonus!");
    }

    #[test]
    fn modest_run_only_earns_mode_badge() {
        let state = SessionState {
            mode: GameMode::Zen,
            max_streak: 4,
            items_collected: 3,
            total_items: 10,
            ..SessionState::default()
        };
        assert_eq!(achievements(&state), vec![Achievement::ZenMaster]);
    }

    #[test]
    fn final_level_summary_offers_completion() {
        let state = SessionState {
            level: 100,
            ..SessionState::default()
        };
        let summary = LevelSummary::from_state(&state, LevelBonus::default());
        assert!(summary.is_final_level);
        assert_eq!(summary.next_label(), "🏆 GAME COMPLETE!");
    }
}
