//! Eco Rangers Game Engine
//!
//! Platform-agnostic core logic for the Eco Rangers recycling sorting game.
//! This crate provides the level catalog, scoring, daily challenge and session
//! state machine without UI, audio synthesis or platform-specific storage.

pub mod catalog;
pub mod category;
pub mod config;
pub mod constants;
pub mod countdown;
pub mod daily;
pub mod error;
pub mod events;
pub mod items;
pub mod result;
pub mod scoring;
pub mod seed;
pub mod session;
pub mod state;
pub mod storage;

// Re-export commonly used types
pub use catalog::{LevelCatalog, LevelDefinition, SpecialMode};
pub use category::Category;
pub use config::GameConfig;
pub use countdown::{Countdown, TickHandle};
pub use daily::{apply_time_bonus, daily_challenge_level, time_bonus_seconds};
pub use error::{CatalogError, ConfigError, StorageError, UnknownCategory};
pub use events::{AudioCue, InputEvent, Notice, Signal, SignalSet, audio_cues};
pub use items::{Item, generate_items};
pub use result::{Achievement, LevelSummary};
pub use scoring::{LevelBonus, SortOutcome, SortScore, level_bonus, score_sort};
pub use session::{GameSession, Transition};
pub use state::{GameMode, GamePhase, SessionState, TimeLeft};
pub use storage::{MemorySnapshotStore, SavedSnapshot, SnapshotHandle, SnapshotStore};

use std::convert::Infallible;

/// Trait for drawing the current session.
/// Platform-specific implementations should provide this
pub trait Renderer {
    fn render(&mut self, state: &SessionState, level: &LevelDefinition);
}

/// Renderer that draws nothing, for headless hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _state: &SessionState, _level: &LevelDefinition) {}
}

/// Trait for playing sound effects.
/// Playback is fire-and-forget: the engine logs failures and carries on.
pub trait AudioSink {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Play `cue` once.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform cannot play the cue.
    fn play(&mut self, cue: AudioCue) -> Result<(), Self::Error>;
}

/// Audio sink that never makes a sound.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    type Error = Infallible;

    fn play(&mut self, _cue: AudioCue) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Main game engine wiring a session to its platform collaborators
pub struct GameEngine<S, A, R>
where
    S: SnapshotStore,
    A: AudioSink,
    R: Renderer,
{
    session: GameSession,
    store: S,
    audio: A,
    renderer: R,
}

impl<S, A, R> GameEngine<S, A, R>
where
    S: SnapshotStore,
    A: AudioSink,
    R: Renderer,
{
    /// Create a new engine around `session` with the provided collaborators
    pub const fn new(session: GameSession, store: S, audio: A, renderer: R) -> Self {
        Self {
            session,
            store,
            audio,
            renderer,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &GameSession {
        &self.session
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        self.session.state()
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn audio(&self) -> &A {
        &self.audio
    }

    #[must_use]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Route one player intent to the session.
    pub fn dispatch(&mut self, event: InputEvent, now_millis: u64) -> Transition {
        log::debug!("dispatching {event:?}");
        let transition = match event {
            InputEvent::DragItemToBin { item_id, bin } => self.session.drop_item(item_id, bin),
            InputEvent::PauseToggle => self.session.toggle_pause(),
            InputEvent::ModeSelect { mode } => self.session.select_mode(mode),
            InputEvent::StartGame => {
                let mode = self.session.state().mode;
                self.session.start_game(mode, now_millis)
            }
            InputEvent::ResumeSaved => self.resume_from_store(),
            InputEvent::NextLevel => self.session.next_level(),
            InputEvent::RestartLevel => self.session.restart_level(),
            InputEvent::QuitToMenu => self.session.quit_to_menu(),
            InputEvent::SaveAndQuit => self.save_and_quit(now_millis),
            InputEvent::RestartGame => self.session.restart_game(),
            InputEvent::ToggleSound => self.session.toggle_sound(),
        };
        self.present(&transition);
        transition
    }

    /// Deliver a countdown tick scheduled with `handle`.
    pub fn tick(&mut self, handle: TickHandle) -> Transition {
        let transition = self.session.tick(handle);
        self.present(&transition);
        transition
    }

    /// Handle for the host's next tick, if a countdown is running.
    #[must_use]
    pub const fn tick_handle(&self) -> Option<TickHandle> {
        self.session.tick_handle()
    }

    /// Description of the retained snapshot for the resume button.
    #[must_use]
    pub fn saved_game_summary(&self, now_millis: u64) -> Option<String> {
        match self.store.load() {
            Ok(snapshot) => snapshot.map(|snapshot| snapshot.describe(now_millis)),
            Err(err) => {
                log::warn!("saved game unreadable: {err}");
                None
            }
        }
    }

    /// Write the save slot and return to the menu.
    ///
    /// A failed write yields an `Applied` transition carrying only
    /// [`Notice::SaveFailed`]; the session is left exactly as it was.
    fn save_and_quit(&mut self, now_millis: u64) -> Transition {
        let phase = self.session.phase();
        if !matches!(phase, GamePhase::Playing | GamePhase::Paused) {
            return Transition::Ignored { phase };
        }
        let snapshot = self.session.snapshot(now_millis);
        match self.store.save(&snapshot) {
            Ok(handle) => {
                log::info!(
                    "saved level {} at {}",
                    snapshot.state.level,
                    handle.saved_at
                );
                let mut signals = SignalSet::new();
                signals.extend(self.session.quit_to_menu().signals().iter().cloned());
                signals.push(Signal::Notice(Notice::Saved));
                Transition::Applied(signals)
            }
            Err(err) => {
                log::warn!("save failed: {err}");
                Transition::Applied(SignalSet::from_iter([Signal::Notice(Notice::SaveFailed)]))
            }
        }
    }

    fn resume_from_store(&mut self) -> Transition {
        let phase = self.session.phase();
        if !matches!(phase, GamePhase::Idle | GamePhase::GameComplete) {
            return Transition::Ignored { phase };
        }
        let snapshot = match self.store.load() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                return Transition::Applied(SignalSet::from_iter([Signal::Notice(
                    Notice::NoSavedGame,
                )]));
            }
            Err(err) => {
                log::warn!("saved game unreadable: {err}");
                return Transition::Applied(SignalSet::from_iter([Signal::Notice(
                    Notice::NoSavedGame,
                )]));
            }
        };

        let transition = self.session.resume_saved(snapshot);
        let Transition::Applied(mut signals) = transition else {
            return transition;
        };
        if let Err(err) = self.store.clear() {
            log::warn!("could not clear resumed save: {err}");
        }
        signals.push(Signal::Notice(Notice::Resumed));
        Transition::Applied(signals)
    }

    fn present(&mut self, transition: &Transition) {
        let Transition::Applied(signals) = transition else {
            return;
        };
        if let Ok(level) = self.session.current_level() {
            self.renderer.render(self.session.state(), level);
        }
        if !self.session.state().sound_enabled {
            return;
        }
        for cue in audio_cues(signals) {
            if let Err(err) = self.audio.play(cue) {
                log::debug!("audio cue {cue:?} failed: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[derive(Debug, thiserror::Error)]
    #[error("speaker unplugged")]
    struct Unplugged;

    #[derive(Default)]
    struct RecordingAudio {
        played: Vec<AudioCue>,
        broken: bool,
    }

    impl AudioSink for RecordingAudio {
        type Error = Unplugged;

        fn play(&mut self, cue: AudioCue) -> Result<(), Self::Error> {
            if self.broken {
                return Err(Unplugged);
            }
            self.played.push(cue);
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingRenderer {
        frames: usize,
        last_level: u8,
    }

    impl Renderer for CountingRenderer {
        fn render(&mut self, _state: &SessionState, level: &LevelDefinition) {
            self.frames += 1;
            self.last_level = level.index;
        }
    }

    struct FullDisk;

    impl SnapshotStore for FullDisk {
        type Error = StorageError;

        fn save(&self, _snapshot: &SavedSnapshot) -> Result<SnapshotHandle, Self::Error> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }

        fn load(&self) -> Result<Option<SavedSnapshot>, Self::Error> {
            Ok(None)
        }

        fn clear(&self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    fn engine<S: SnapshotStore>(store: S) -> GameEngine<S, RecordingAudio, CountingRenderer> {
        let session = GameSession::new(Rc::new(LevelCatalog::generate(3)), 3);
        GameEngine::new(
            session,
            store,
            RecordingAudio::default(),
            CountingRenderer::default(),
        )
    }

    fn sort_one<S: SnapshotStore>(engine: &mut GameEngine<S, RecordingAudio, CountingRenderer>) {
        let item = engine.state().current_items[0].clone();
        let event = InputEvent::DragItemToBin {
            item_id: item.id,
            bin: item.category,
        };
        assert!(engine.dispatch(event, 0).is_applied());
    }

    #[test]
    fn start_game_uses_selected_mode() {
        let mut engine = engine(MemorySnapshotStore::new());
        engine.dispatch(
            InputEvent::ModeSelect {
                mode: GameMode::Zen,
            },
            0,
        );
        engine.dispatch(InputEvent::StartGame, 0);
        assert_eq!(engine.state().mode, GameMode::Zen);
        assert_eq!(engine.state().time_left, TimeLeft::Unlimited);
        assert_eq!(engine.renderer().last_level, 1);
        assert!(engine.renderer().frames >= 2);
    }

    #[test]
    fn save_and_quit_then_resume_round_trips() {
        let store = MemorySnapshotStore::new();
        let mut engine = engine(store.clone());
        engine.dispatch(InputEvent::StartGame, 0);
        sort_one(&mut engine);
        engine.dispatch(InputEvent::PauseToggle, 0);
        let before = engine.state().clone();

        let saved = engine.dispatch(InputEvent::SaveAndQuit, 60_000);
        assert!(saved.signals().contains(&Signal::Notice(Notice::Saved)));
        assert_eq!(engine.state().phase, GamePhase::Idle);
        assert!(store.has_snapshot());
        assert_eq!(
            engine.saved_game_summary(120_000).as_deref(),
            Some("Level 1 - adventure mode (saved 1 minute ago)")
        );

        let resumed = engine.dispatch(InputEvent::ResumeSaved, 120_000);
        assert!(resumed.signals().contains(&Signal::Notice(Notice::Resumed)));
        assert!(!store.has_snapshot());
        let after = engine.state();
        assert_eq!(after.score, before.score);
        assert_eq!(after.current_items, before.current_items);
        assert_eq!(after.phase, GamePhase::Playing);
        assert!(!after.is_paused);
        assert!(engine.tick_handle().is_some());
    }

    #[test]
    fn failed_save_leaves_session_untouched() {
        let mut engine = engine(FullDisk);
        engine.dispatch(InputEvent::StartGame, 0);
        engine.dispatch(InputEvent::PauseToggle, 0);
        let before = engine.state().clone();

        let transition = engine.dispatch(InputEvent::SaveAndQuit, 0);
        assert_eq!(
            transition.signals(),
            &[Signal::Notice(Notice::SaveFailed)]
        );
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn resume_without_save_reports_notice() {
        let mut engine = engine(MemorySnapshotStore::new());
        let transition = engine.dispatch(InputEvent::ResumeSaved, 0);
        assert_eq!(
            transition.signals(),
            &[Signal::Notice(Notice::NoSavedGame)]
        );
        assert_eq!(engine.state().phase, GamePhase::Idle);
    }

    #[test]
    fn corrupt_save_is_treated_as_missing() {
        let store = MemorySnapshotStore::new();
        store.put_raw("{]");
        let mut engine = engine(store);
        assert_eq!(engine.saved_game_summary(0), None);
        let transition = engine.dispatch(InputEvent::ResumeSaved, 0);
        assert_eq!(
            transition.signals(),
            &[Signal::Notice(Notice::NoSavedGame)]
        );
    }

    #[test]
    fn muted_engine_plays_nothing() {
        let mut engine = engine(MemorySnapshotStore::new());
        engine.dispatch(InputEvent::StartGame, 0);
        assert_eq!(engine.audio().played, vec![AudioCue::ButtonClick]);

        engine.dispatch(InputEvent::ToggleSound, 0);
        sort_one(&mut engine);
        assert_eq!(engine.audio().played, vec![AudioCue::ButtonClick]);

        engine.dispatch(InputEvent::ToggleSound, 0);
        sort_one(&mut engine);
        assert_eq!(
            engine.audio().played,
            vec![
                AudioCue::ButtonClick,
                AudioCue::ButtonClick,
                AudioCue::CorrectSort
            ]
        );
    }

    #[test]
    fn audio_failures_do_not_interrupt_play() {
        let mut engine = engine(MemorySnapshotStore::new());
        engine.audio.broken = true;
        assert!(engine.dispatch(InputEvent::StartGame, 0).is_applied());
        sort_one(&mut engine);
        assert_eq!(engine.state().items_collected, 1);
        assert!(engine.audio().played.is_empty());
    }

    #[test]
    fn ticks_route_through_engine() {
        let mut engine = engine(MemorySnapshotStore::new());
        engine.dispatch(InputEvent::StartGame, 0);
        let handle = engine.tick_handle().unwrap();
        assert!(engine.tick(handle).is_applied());
        assert_eq!(engine.state().time_left, TimeLeft::Finite(89));

        engine.dispatch(InputEvent::PauseToggle, 0);
        assert!(!engine.tick(handle).is_applied());
    }
}
