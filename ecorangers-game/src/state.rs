//! Session data model: the single mutable record of an active game.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog::SpecialMode;
use crate::category::Category;
use crate::constants::LEVEL_COUNT;
use crate::items::Item;

const DEFAULT_TIME_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Adventure,
    Zen,
    TimeAttack,
    Challenge,
}

impl GameMode {
    pub const ALL: [Self; 4] = [Self::Adventure, Self::Zen, Self::TimeAttack, Self::Challenge];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Adventure => "adventure",
            Self::Zen => "zen",
            Self::TimeAttack => "timeattack",
            Self::Challenge => "challenge",
        }
    }

    #[must_use]
    pub const fn has_countdown(self) -> bool {
        !matches!(self, Self::Zen)
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adventure" => Ok(Self::Adventure),
            "zen" => Ok(Self::Zen),
            "timeattack" | "time-attack" => Ok(Self::TimeAttack),
            "challenge" | "daily" => Ok(Self::Challenge),
            _ => Err(()),
        }
    }
}

/// Screen-level phase of the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum GamePhase {
    #[default]
    Idle,
    Playing,
    Paused,
    LevelComplete,
    GameComplete,
}

/// Remaining level time; zen mode never counts down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeLeft {
    Finite(u32),
    Unlimited,
}

impl TimeLeft {
    #[must_use]
    pub const fn seconds(self) -> Option<u32> {
        match self {
            Self::Finite(secs) => Some(secs),
            Self::Unlimited => None,
        }
    }

    #[must_use]
    pub const fn is_expired(self) -> bool {
        matches!(self, Self::Finite(0))
    }

    /// True when more than `threshold` seconds remain.
    #[must_use]
    pub const fn exceeds(self, threshold: u32) -> bool {
        match self {
            Self::Finite(secs) => secs > threshold,
            Self::Unlimited => true,
        }
    }

    /// Seconds credited by the end-of-level time bonus.
    #[must_use]
    pub const fn bonus_seconds(self) -> u32 {
        match self {
            Self::Finite(secs) => secs,
            Self::Unlimited => 0,
        }
    }

    #[must_use]
    pub const fn plus(self, secs: u32) -> Self {
        match self {
            Self::Finite(current) => Self::Finite(current.saturating_add(secs)),
            Self::Unlimited => Self::Unlimited,
        }
    }

    #[must_use]
    pub const fn decremented(self) -> Self {
        match self {
            Self::Finite(current) => Self::Finite(current.saturating_sub(1)),
            Self::Unlimited => Self::Unlimited,
        }
    }
}

impl Default for TimeLeft {
    fn default() -> Self {
        Self::Finite(DEFAULT_TIME_SECS)
    }
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(secs) => write!(f, "{secs}"),
            Self::Unlimited => f.write_str("∞"),
        }
    }
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u64,
    pub level: u8,
    pub time_left: TimeLeft,
    pub streak: u32,
    pub max_streak: u32,
    pub combo_multiplier: u32,
    pub items_collected: u32,
    pub total_items: u32,
    pub mode: GameMode,
    pub is_daily_challenge: bool,
    pub time_bonus_count: u32,
    pub is_paused: bool,
    #[serde(default = "default_sound")]
    pub sound_enabled: bool,
    #[serde(default)]
    pub phase: GamePhase,
    #[serde(default)]
    pub special_mode: Option<SpecialMode>,
    #[serde(default = "default_bins")]
    pub bins: Vec<Category>,
    #[serde(default)]
    pub current_items: Vec<Item>,
}

const fn default_sound() -> bool {
    true
}

fn default_bins() -> Vec<Category> {
    vec![
        Category::Plastic,
        Category::Paper,
        Category::Glass,
        Category::Organic,
    ]
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            score: 0,
            level: 1,
            time_left: TimeLeft::default(),
            streak: 0,
            max_streak: 0,
            combo_multiplier: 1,
            items_collected: 0,
            total_items: 0,
            mode: GameMode::default(),
            is_daily_challenge: false,
            time_bonus_count: 0,
            is_paused: false,
            sound_enabled: default_sound(),
            phase: GamePhase::Idle,
            special_mode: None,
            bins: default_bins(),
            current_items: Vec::new(),
        }
    }
}

impl SessionState {
    /// Fresh state that keeps only the sound preference.
    #[must_use]
    pub fn reset_keeping_preferences(&self) -> Self {
        Self {
            sound_enabled: self.sound_enabled,
            ..Self::default()
        }
    }

    /// Level number clamped into the catalog range.
    #[must_use]
    pub fn clamped_level(&self) -> u8 {
        self.level.clamp(1, LEVEL_COUNT)
    }

    #[must_use]
    pub const fn is_final_level(&self) -> bool {
        self.level >= LEVEL_COUNT
    }

    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.total_items > 0 && self.items_collected == self.total_items
    }

    #[must_use]
    pub fn item(&self, id: u32) -> Option<&Item> {
        self.current_items.iter().find(|item| item.id == id)
    }

    /// Remove and return the item with `id`, if still present.
    pub fn take_item(&mut self, id: u32) -> Option<Item> {
        let position = self.current_items.iter().position(|item| item.id == id)?;
        Some(self.current_items.remove(position))
    }

    /// Record a correct sort on the streak counters.
    pub fn extend_streak(&mut self) {
        self.streak = self.streak.saturating_add(1);
        if self.streak > self.max_streak {
            self.max_streak = self.streak;
        }
    }

    /// Record an incorrect sort.
    pub const fn break_streak(&mut self) {
        self.streak = 0;
        self.combo_multiplier = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_left_handles_unlimited_sentinel() {
        assert!(TimeLeft::Unlimited.exceeds(30));
        assert_eq!(TimeLeft::Unlimited.decremented(), TimeLeft::Unlimited);
        assert_eq!(TimeLeft::Unlimited.plus(5), TimeLeft::Unlimited);
        assert_eq!(TimeLeft::Unlimited.bonus_seconds(), 0);
        assert_eq!(TimeLeft::Finite(0).decremented(), TimeLeft::Finite(0));
        assert!(TimeLeft::Finite(0).is_expired());
        assert!(!TimeLeft::Finite(30).exceeds(30));
    }

    #[test]
    fn streak_updates_keep_max_streak_ahead() {
        let mut state = SessionState::default();
        state.extend_streak();
        state.extend_streak();
        assert_eq!((state.streak, state.max_streak), (2, 2));

        state.combo_multiplier = 3;
        state.break_streak();
        assert_eq!((state.streak, state.max_streak), (0, 2));
        assert_eq!(state.combo_multiplier, 1);

        state.extend_streak();
        assert_eq!((state.streak, state.max_streak), (1, 2));
    }

    #[test]
    fn reset_keeps_only_sound_preference() {
        let state = SessionState {
            score: 900,
            level: 12,
            sound_enabled: false,
            ..SessionState::default()
        };
        let reset = state.reset_keeping_preferences();
        assert_eq!(reset.score, 0);
        assert_eq!(reset.level, 1);
        assert!(!reset.sound_enabled);
    }

    #[test]
    fn mode_names_parse() {
        for mode in GameMode::ALL {
            assert_eq!(mode.as_str().parse::<GameMode>(), Ok(mode));
        }
        assert_eq!("time-attack".parse::<GameMode>(), Ok(GameMode::TimeAttack));
        assert!("arcade".parse::<GameMode>().is_err());
        assert!(!GameMode::Zen.has_countdown());
    }
}
