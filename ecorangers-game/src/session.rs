//! Session state machine binding the level catalog, countdown and scoring.
//!
//! `GameSession` owns the one mutable [`SessionState`] of a running game.
//! Every public operation either applies a legal transition and returns the
//! signals it produced, or leaves the state untouched and reports the call as
//! ignored. Nothing here panics or returns an error during normal play.

use rand_chacha::ChaCha20Rng;
use std::rc::Rc;

use crate::catalog::{LevelCatalog, LevelDefinition};
use crate::category::Category;
use crate::config::GameConfig;
use crate::constants::{
    HURRY_WARNING_SECS, LEVEL_COUNT, TIME_ATTACK_FLOOR_SECS, TIME_ATTACK_REDUCTION_SECS,
};
use crate::countdown::{Countdown, TickHandle};
use crate::daily::daily_challenge_level;
use crate::error::CatalogError;
use crate::events::{Signal, SignalSet};
use crate::items::generate_items;
use crate::result::LevelSummary;
use crate::scoring::{SortOutcome, level_bonus, score_sort};
use crate::seed::{ITEM_STREAM, entropy_seed, stream_rng};
use crate::state::{GameMode, GamePhase, SessionState, TimeLeft};
use crate::storage::SavedSnapshot;

/// Outcome of a state-machine operation.
///
/// An `Applied` transition whose only signals are [`Signal::Notice`] values
/// changed no session state; hosts show the notice and stay on the current
/// screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Applied(SignalSet),
    /// The operation is not legal in `phase` (or had nothing to act on).
    Ignored { phase: GamePhase },
}

impl Transition {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    #[must_use]
    pub fn signals(&self) -> &[Signal] {
        match self {
            Self::Applied(signals) => signals,
            Self::Ignored { .. } => &[],
        }
    }
}

/// Starting clock for a level under `mode`.
#[must_use]
pub fn initial_time(mode: GameMode, level: &LevelDefinition) -> TimeLeft {
    match mode {
        GameMode::Zen => TimeLeft::Unlimited,
        GameMode::TimeAttack => TimeLeft::Finite(
            level
                .time_limit
                .saturating_sub(TIME_ATTACK_REDUCTION_SECS)
                .max(TIME_ATTACK_FLOOR_SECS),
        ),
        GameMode::Adventure | GameMode::Challenge => TimeLeft::Finite(level.time_limit),
    }
}

#[derive(Debug, Clone)]
pub struct GameSession {
    catalog: Rc<LevelCatalog>,
    state: SessionState,
    countdown: Countdown,
    rng: ChaCha20Rng,
}

impl GameSession {
    /// Construct an idle session drawing items from `item_seed`.
    #[must_use]
    pub fn new(catalog: Rc<LevelCatalog>, item_seed: u64) -> Self {
        Self {
            catalog,
            state: SessionState::default(),
            countdown: Countdown::new(),
            rng: stream_rng(item_seed, ITEM_STREAM),
        }
    }

    /// Construct an idle session from host configuration.
    #[must_use]
    pub fn from_config(cfg: &GameConfig) -> Self {
        let catalog = Rc::new(cfg.build_catalog());
        let mut session = Self::new(catalog, cfg.item_seed.unwrap_or_else(entropy_seed));
        session.state.sound_enabled = cfg.sound_enabled;
        session
    }

    /// Borrow the underlying immutable session state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.state.phase
    }

    #[must_use]
    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    /// Definition of the level currently being played.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog has no entry for the current level.
    pub fn current_level(&self) -> Result<&LevelDefinition, CatalogError> {
        self.catalog.level(u32::from(self.state.clamped_level()))
    }

    /// Handle the host must attach to its next one-second tick, if counting down.
    #[must_use]
    pub const fn tick_handle(&self) -> Option<TickHandle> {
        self.countdown.active()
    }

    /// Reseed the item stream, e.g. to replay a recorded run.
    pub fn reseed_items(&mut self, seed: u64) {
        self.rng = stream_rng(seed, ITEM_STREAM);
    }

    /// Deep copy of the session suitable for the save slot.
    #[must_use]
    pub fn snapshot(&self, now_millis: u64) -> SavedSnapshot {
        SavedSnapshot::capture(&self.state, now_millis)
    }

    fn ignored(&self, operation: &str) -> Transition {
        log::debug!("{operation} ignored in phase {:?}", self.state.phase);
        Transition::Ignored {
            phase: self.state.phase,
        }
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.state.phase != phase {
            log::debug!("session phase {:?} -> {phase:?}", self.state.phase);
        }
        self.state.phase = phase;
        self.state.is_paused = phase == GamePhase::Paused;
        if phase != GamePhase::Playing {
            self.countdown.cancel();
        }
    }

    fn arm_countdown_if_needed(&mut self) {
        let counting = self.state.mode.has_countdown()
            && matches!(self.state.time_left, TimeLeft::Finite(secs) if secs > 0);
        if counting {
            self.countdown.arm();
        } else {
            self.countdown.cancel();
        }
    }

    /// Lay out the current level: clock, bins and a fresh item set.
    fn enter_level(&mut self, signals: &mut SignalSet) -> bool {
        let catalog = Rc::clone(&self.catalog);
        let level = match catalog.level(u32::from(self.state.clamped_level())) {
            Ok(level) => level,
            Err(err) => {
                log::error!("cannot enter level {}: {err}", self.state.level);
                self.set_phase(GamePhase::Idle);
                return false;
            }
        };

        self.state.level = level.index;
        self.state.time_left = initial_time(self.state.mode, level);
        self.state.total_items = level.item_count;
        self.state.items_collected = 0;
        self.state.special_mode = level.special_mode;
        self.state.bins.clone_from(&level.allowed_categories);
        self.state.current_items = generate_items(level, &mut self.rng);
        self.set_phase(GamePhase::Playing);
        self.arm_countdown_if_needed();

        log::debug!(
            "entered level {} ({}) in {} mode with {} items",
            level.index,
            level.location,
            self.state.mode,
            level.item_count
        );
        if let Some(special) = level.special_mode
            && special.announcement().is_some()
        {
            signals.push(Signal::SpecialModeActivated(special));
        }
        true
    }

    /// Choose the mode on the start screen, including the one shown after the
    /// final level.
    pub fn select_mode(&mut self, mode: GameMode) -> Transition {
        if !matches!(self.state.phase, GamePhase::Idle | GamePhase::GameComplete) {
            return self.ignored("select_mode");
        }
        self.set_phase(GamePhase::Idle);
        self.state.mode = mode;
        self.state.level = 1;
        self.state.is_daily_challenge = false;
        self.state.time_bonus_count = 0;
        Transition::Applied(SignalSet::from_iter([Signal::ButtonClick]))
    }

    /// Begin a fresh run in `mode`.
    pub fn start_game(&mut self, mode: GameMode, now_millis: u64) -> Transition {
        if !matches!(self.state.phase, GamePhase::Idle | GamePhase::GameComplete) {
            return self.ignored("start_game");
        }
        self.state = self.state.reset_keeping_preferences();
        self.state.mode = mode;
        if mode == GameMode::Challenge {
            self.state.level = daily_challenge_level(now_millis);
            self.state.is_daily_challenge = true;
        }
        log::info!("starting {mode} game at level {}", self.state.level);

        let mut signals = SignalSet::from_iter([Signal::ButtonClick]);
        if self.enter_level(&mut signals) {
            Transition::Applied(signals)
        } else {
            self.ignored("start_game")
        }
    }

    /// Continue a saved run exactly where it was left.
    pub fn resume_saved(&mut self, snapshot: SavedSnapshot) -> Transition {
        if !matches!(self.state.phase, GamePhase::Idle | GamePhase::GameComplete) {
            return self.ignored("resume_saved");
        }
        let mut state = snapshot.into_resumable();
        state.level = state.clamped_level();
        state.is_daily_challenge = state.mode == GameMode::Challenge;
        self.state = state;
        self.set_phase(GamePhase::Playing);
        self.arm_countdown_if_needed();
        log::info!(
            "resumed {} game at level {} with {} items left",
            self.state.mode,
            self.state.level,
            self.state.current_items.len()
        );
        Transition::Applied(SignalSet::from_iter([Signal::ButtonClick]))
    }

    pub fn pause(&mut self) -> Transition {
        if self.state.phase != GamePhase::Playing || self.state.is_paused {
            return self.ignored("pause");
        }
        self.set_phase(GamePhase::Paused);
        Transition::Applied(SignalSet::from_iter([Signal::ButtonClick]))
    }

    pub fn resume(&mut self) -> Transition {
        if self.state.phase != GamePhase::Paused {
            return self.ignored("resume");
        }
        self.set_phase(GamePhase::Playing);
        self.arm_countdown_if_needed();
        Transition::Applied(SignalSet::from_iter([Signal::ButtonClick]))
    }

    pub fn toggle_pause(&mut self) -> Transition {
        match self.state.phase {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => self.ignored("toggle_pause"),
        }
    }

    /// Drop item `item_id` onto the `bin` bin.
    pub fn drop_item(&mut self, item_id: u32, bin: Category) -> Transition {
        if self.state.phase != GamePhase::Playing {
            return self.ignored("drop_item");
        }
        if !self.state.bins.contains(&bin) {
            return self.ignored("drop_item on missing bin");
        }

        let mut signals = SignalSet::new();
        match score_sort(&mut self.state, item_id, bin) {
            SortOutcome::Missing { .. } => return self.ignored("drop_item on sorted item"),
            SortOutcome::Incorrect { item_id, bin } => {
                signals.push(Signal::Missorted { item_id, bin });
            }
            SortOutcome::Correct {
                item,
                score,
                milestone,
                time_bonus,
                level_cleared,
            } => {
                signals.push(Signal::Sorted {
                    item_id: item.id,
                    points: score.total(),
                    golden: item.golden,
                });
                if milestone {
                    signals.push(Signal::StreakMilestone {
                        streak: self.state.streak,
                    });
                }
                if let Some(seconds) = time_bonus {
                    signals.push(Signal::TimeBonus {
                        seconds,
                        streak: self.state.streak,
                    });
                }
                if level_cleared {
                    signals.extend(self.complete_level());
                }
            }
        }
        Transition::Applied(signals)
    }

    /// Advance the countdown by one second for the run identified by `handle`.
    pub fn tick(&mut self, handle: TickHandle) -> Transition {
        if self.state.phase != GamePhase::Playing || !self.countdown.accepts(handle) {
            return self.ignored("stale tick");
        }
        self.state.time_left = self.state.time_left.decremented();

        let mut signals = SignalSet::new();
        if self.state.time_left == TimeLeft::Finite(HURRY_WARNING_SECS) {
            signals.push(Signal::HurryUp);
        }
        if self.state.time_left.is_expired() {
            signals.extend(self.complete_level());
        }
        Transition::Applied(signals)
    }

    /// Finish the level now, crediting the end-of-level bonus.
    pub fn end_level(&mut self) -> Transition {
        if self.state.phase != GamePhase::Playing {
            return self.ignored("end_level");
        }
        Transition::Applied(self.complete_level())
    }

    fn complete_level(&mut self) -> SignalSet {
        self.set_phase(GamePhase::LevelComplete);
        let bonus = level_bonus(&self.state);
        self.state.score = self.state.score.saturating_add(bonus.total());
        let summary = LevelSummary::from_state(&self.state, bonus);
        log::info!(
            "level {} complete: +{} bonus, score {}",
            summary.level,
            bonus.total(),
            summary.score
        );
        SignalSet::from_iter([Signal::LevelComplete(Box::new(summary))])
    }

    /// Move on from the level-complete screen.
    pub fn next_level(&mut self) -> Transition {
        if self.state.phase != GamePhase::LevelComplete {
            return self.ignored("next_level");
        }
        if self.state.level >= LEVEL_COUNT {
            self.state.level = LEVEL_COUNT;
            self.set_phase(GamePhase::GameComplete);
            log::info!("all levels complete with score {}", self.state.score);
            return Transition::Applied(SignalSet::from_iter([
                Signal::ButtonClick,
                Signal::GameComplete,
            ]));
        }

        self.state.level += 1;
        self.state.streak = 0;
        self.state.max_streak = 0;
        let mut signals = SignalSet::from_iter([Signal::ButtonClick]);
        if self.enter_level(&mut signals) {
            Transition::Applied(signals)
        } else {
            self.ignored("next_level")
        }
    }

    /// Replay the current level from the pause menu.
    pub fn restart_level(&mut self) -> Transition {
        if self.state.phase != GamePhase::Paused {
            return self.ignored("restart_level");
        }
        self.state.items_collected = 0;
        self.state.streak = 0;
        self.state.combo_multiplier = 1;
        let mut signals = SignalSet::from_iter([Signal::ButtonClick]);
        if self.enter_level(&mut signals) {
            Transition::Applied(signals)
        } else {
            self.ignored("restart_level")
        }
    }

    /// Return to the start screen, keeping score and level for a later save.
    pub fn quit_to_menu(&mut self) -> Transition {
        self.set_phase(GamePhase::Idle);
        self.state.is_daily_challenge = false;
        Transition::Applied(SignalSet::from_iter([Signal::ButtonClick]))
    }

    /// Throw away all progress; only the sound preference survives.
    pub fn restart_game(&mut self) -> Transition {
        self.countdown.cancel();
        self.state = self.state.reset_keeping_preferences();
        log::debug!("game restarted");
        Transition::Applied(SignalSet::from_iter([Signal::ButtonClick]))
    }

    pub fn toggle_sound(&mut self) -> Transition {
        self.state.sound_enabled = !self.state.sound_enabled;
        Transition::Applied(SignalSet::from_iter([Signal::SoundToggled {
            enabled: self.state.sound_enabled,
        }]))
    }
}
