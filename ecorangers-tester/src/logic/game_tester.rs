use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;
use ecorangers_game::{
    GameConfig, GameEngine, GameMode, GamePhase, GameSession, InputEvent, LevelCatalog,
    MemorySnapshotStore, Notice, NullRenderer, SessionState, Signal, SilentAudio, Transition,
    constants::LEVEL_COUNT,
};

use crate::logic::simulation::{InvariantMonitor, PlayerMove, ScriptedPlayer};

const MAX_STEPS: usize = 250_000;
const DEFAULT_ACCURACY: f64 = 0.9;

type Engine = GameEngine<MemorySnapshotStore, SilentAudio, NullRenderer>;

/// Declarative plan for running a simulated game.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub mode: GameMode,
    pub max_levels: u8,
    pub accuracy: f64,
    /// Save, quit and resume at the start of every n-th level.
    pub save_resume_every: Option<u8>,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub const fn new(mode: GameMode) -> Self {
        Self {
            mode,
            max_levels: 1,
            accuracy: DEFAULT_ACCURACY,
            save_resume_every: None,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_max_levels(mut self, max_levels: u8) -> Self {
        self.max_levels = max_levels.clamp(1, LEVEL_COUNT);
        self
    }

    #[must_use]
    pub const fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    #[must_use]
    pub const fn with_save_resume_every(mut self, every: u8) -> Self {
        self.save_resume_every = Some(every);
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    #[must_use]
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Evaluate the expectation against `summary`.
    ///
    /// # Errors
    ///
    /// Returns the expectation's failure message.
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

/// Outcome of one finished level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelReport {
    pub level: u8,
    pub score: u64,
    pub bonus: u64,
    pub perfect: bool,
    pub achievements: Vec<String>,
}

/// Everything observed during one simulated game.
#[derive(Debug, Clone, Default)]
pub struct SimulationSummary {
    pub seed: u64,
    pub mode: GameMode,
    pub starting_level: u8,
    pub catalog_fingerprint: u64,
    pub final_state: SessionState,
    pub levels: Vec<LevelReport>,
    pub game_complete: bool,
    pub correct_sorts: u32,
    pub wrong_sorts: u32,
    pub ticks: u32,
    pub hurry_warnings: u32,
    pub time_bonuses: Vec<u32>,
    pub pauses: u32,
    pub save_round_trips: u32,
    pub steps: usize,
    pub violations: Vec<String>,
}

impl SimulationSummary {
    #[must_use]
    pub fn levels_completed(&self) -> usize {
        self.levels.len()
    }

    fn record(&mut self, transition: &Transition) {
        for signal in transition.signals() {
            match signal {
                Signal::Sorted { .. } => self.correct_sorts += 1,
                Signal::Missorted { .. } => self.wrong_sorts += 1,
                Signal::HurryUp => self.hurry_warnings += 1,
                Signal::TimeBonus { seconds, .. } => self.time_bonuses.push(*seconds),
                Signal::LevelComplete(summary) => self.levels.push(LevelReport {
                    level: summary.level,
                    score: summary.score,
                    bonus: summary.bonus.total(),
                    perfect: summary.bonus.perfect > 0,
                    achievements: summary
                        .achievements
                        .iter()
                        .map(ToString::to_string)
                        .collect(),
                }),
                Signal::GameComplete => self.game_complete = true,
                _ => {}
            }
        }
    }
}

/// Drives complete games through the engine with a scripted player.
#[derive(Debug, Clone)]
pub struct GameTester {
    config: GameConfig,
    now_millis: u64,
    verbose: bool,
}

impl GameTester {
    #[must_use]
    pub const fn new(config: GameConfig, now_millis: u64, verbose: bool) -> Self {
        Self {
            config,
            now_millis,
            verbose,
        }
    }

    #[must_use]
    pub const fn now_millis(&self) -> u64 {
        self.now_millis
    }

    fn build_engine(&self, seed: u64) -> Engine {
        let catalog = LevelCatalog::generate(self.config.catalog_seed.unwrap_or(seed));
        let session = GameSession::new(Rc::new(catalog), self.config.item_seed.unwrap_or(seed));
        GameEngine::new(session, MemorySnapshotStore::new(), SilentAudio, NullRenderer)
    }

    /// Play one game following `plan` from `seed`.
    #[must_use]
    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> SimulationSummary {
        let now = self.now_millis;
        let mut engine = self.build_engine(seed);
        let mut player = ScriptedPlayer::new(seed, plan.accuracy);
        let mut monitor = InvariantMonitor::default();
        let mut summary = SimulationSummary {
            seed,
            mode: plan.mode,
            catalog_fingerprint: engine.session().catalog().fingerprint(),
            ..SimulationSummary::default()
        };

        if engine.state().sound_enabled != self.config.sound_enabled {
            engine.dispatch(InputEvent::ToggleSound, now);
        }
        engine.dispatch(InputEvent::ModeSelect { mode: plan.mode }, now);
        let start = engine.dispatch(InputEvent::StartGame, now);
        summary.record(&start);
        summary.starting_level = engine.state().level;
        if engine.state().phase != GamePhase::Playing {
            summary
                .violations
                .push(format!("start left phase {:?}", engine.state().phase));
        }

        while summary.levels_completed() < usize::from(plan.max_levels) {
            if summary.steps >= MAX_STEPS {
                summary
                    .violations
                    .push(format!("stalled after {MAX_STEPS} steps"));
                break;
            }
            summary.steps += 1;

            let transition = match engine.state().phase {
                GamePhase::Playing => {
                    match player.choose(engine.state(), engine.tick_handle()) {
                        Some(PlayerMove::Tick(handle)) => {
                            summary.ticks += 1;
                            engine.tick(handle)
                        }
                        Some(PlayerMove::PauseBreak) => {
                            summary.pauses += 1;
                            let paused = engine.dispatch(InputEvent::PauseToggle, now);
                            summary.violations.extend(monitor.check(engine.state()));
                            summary.record(&paused);
                            engine.dispatch(InputEvent::PauseToggle, now)
                        }
                        Some(PlayerMove::Drop { item_id, bin }) => {
                            engine.dispatch(InputEvent::DragItemToBin { item_id, bin }, now)
                        }
                        None => {
                            summary
                                .violations
                                .push("playing with an empty field".to_string());
                            break;
                        }
                    }
                }
                GamePhase::LevelComplete => {
                    let next = engine.dispatch(InputEvent::NextLevel, now);
                    if let Some(every) = plan.save_resume_every
                        && engine.state().phase == GamePhase::Playing
                        && summary.levels_completed() % usize::from(every.max(1)) == 0
                    {
                        self.save_round_trip(&mut engine, &mut summary);
                    }
                    next
                }
                GamePhase::GameComplete => break,
                phase @ (GamePhase::Idle | GamePhase::Paused) => {
                    summary
                        .violations
                        .push(format!("simulation stuck in {phase:?}"));
                    break;
                }
            };

            summary.record(&transition);
            summary.violations.extend(monitor.check(engine.state()));
        }

        if engine.state().phase == GamePhase::LevelComplete && engine.state().is_final_level() {
            let finale = engine.dispatch(InputEvent::NextLevel, now);
            summary.record(&finale);
        }

        summary.final_state = engine.state().clone();
        if self.verbose {
            println!(
                "    seed {seed}: {} levels, score {}, {} correct / {} wrong",
                summary.levels_completed(),
                summary.final_state.score,
                summary.correct_sorts,
                summary.wrong_sorts
            );
        }
        summary
    }

    fn save_round_trip(&self, engine: &mut Engine, summary: &mut SimulationSummary) {
        let now = self.now_millis;
        engine.dispatch(InputEvent::PauseToggle, now);
        let before = engine.state().clone();

        let saved = engine.dispatch(InputEvent::SaveAndQuit, now);
        if !saved.signals().contains(&Signal::Notice(Notice::Saved))
            || engine.state().phase != GamePhase::Idle
        {
            summary
                .violations
                .push(format!("save and quit failed at level {}", before.level));
            return;
        }

        let resumed = engine.dispatch(InputEvent::ResumeSaved, now);
        let after = engine.state();
        if !resumed.signals().contains(&Signal::Notice(Notice::Resumed)) {
            summary
                .violations
                .push(format!("resume failed at level {}", before.level));
            return;
        }
        let restored = after.score == before.score
            && after.level == before.level
            && after.time_left == before.time_left
            && after.streak == before.streak
            && after.current_items == before.current_items
            && after.is_daily_challenge == before.is_daily_challenge
            && after.phase == GamePhase::Playing
            && !after.is_paused;
        if restored {
            summary.save_round_trips += 1;
        } else {
            summary
                .violations
                .push(format!("resumed state differs at level {}", before.level));
        }
    }
}
