use ecorangers_game::constants::LEVEL_COUNT;
use ecorangers_game::seed::derive_stream_seed;
use ecorangers_game::{Category, GamePhase, SessionState, TickHandle};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

const PLAYER_STREAM: &[u8] = b"scripted-player";
const TICK_CHANCE: f64 = 0.5;
const PAUSE_CHANCE: f64 = 0.02;

/// One decision made by the scripted player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerMove {
    Drop { item_id: u32, bin: Category },
    Tick(TickHandle),
    PauseBreak,
}

/// Seeded stand-in for a human: sorts items with a fixed accuracy and lets
/// the clock run between drops.
#[derive(Debug, Clone)]
pub struct ScriptedPlayer {
    rng: ChaCha20Rng,
    accuracy: f64,
}

impl ScriptedPlayer {
    #[must_use]
    pub fn new(seed: u64, accuracy: f64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(derive_stream_seed(seed, PLAYER_STREAM)),
            accuracy: accuracy.clamp(0.0, 1.0),
        }
    }

    /// Pick the next move, or `None` when the field is empty.
    pub fn choose(&mut self, state: &SessionState, tick: Option<TickHandle>) -> Option<PlayerMove> {
        if let Some(handle) = tick
            && self.rng.gen_bool(TICK_CHANCE)
        {
            return Some(PlayerMove::Tick(handle));
        }
        if self.rng.gen_bool(PAUSE_CHANCE) {
            return Some(PlayerMove::PauseBreak);
        }
        if state.current_items.is_empty() {
            return None;
        }

        let item = &state.current_items[self.rng.gen_range(0..state.current_items.len())];
        let bin = if self.rng.gen_bool(self.accuracy) {
            item.category
        } else {
            let wrong: Vec<Category> = state
                .bins
                .iter()
                .copied()
                .filter(|bin| *bin != item.category)
                .collect();
            if wrong.is_empty() {
                item.category
            } else {
                wrong[self.rng.gen_range(0..wrong.len())]
            }
        };
        Some(PlayerMove::Drop {
            item_id: item.id,
            bin,
        })
    }
}

/// Checks the session invariants after every simulated step.
#[derive(Debug, Clone, Default)]
pub struct InvariantMonitor {
    last_score: u64,
}

impl InvariantMonitor {
    pub fn check(&mut self, state: &SessionState) -> Vec<String> {
        let mut violations = Vec::new();
        if state.max_streak < state.streak {
            violations.push(format!(
                "max streak {} below streak {}",
                state.max_streak, state.streak
            ));
        }
        if state.items_collected > state.total_items {
            violations.push(format!(
                "collected {} of only {} items",
                state.items_collected, state.total_items
            ));
        }
        if !(1..=LEVEL_COUNT).contains(&state.level) {
            violations.push(format!("level {} out of range", state.level));
        }
        if state.score < self.last_score {
            violations.push(format!(
                "score dropped from {} to {}",
                self.last_score, state.score
            ));
        }
        if state.combo_multiplier == 0 {
            violations.push("combo multiplier is zero".to_string());
        }
        if state.is_paused != (state.phase == GamePhase::Paused) {
            violations.push(format!(
                "pause flag {} disagrees with phase {:?}",
                state.is_paused, state.phase
            ));
        }
        if state.phase == GamePhase::Playing {
            let on_field = u32::try_from(state.current_items.len()).unwrap_or(u32::MAX);
            if state.items_collected.saturating_add(on_field) != state.total_items {
                violations.push(format!(
                    "{} collected + {on_field} on field != {} total",
                    state.items_collected, state.total_items
                ));
            }
        }
        self.last_score = state.score;
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecorangers_game::Item;

    fn field() -> SessionState {
        SessionState {
            phase: GamePhase::Playing,
            bins: vec![Category::Plastic, Category::Paper],
            total_items: 2,
            current_items: vec![
                Item {
                    category: Category::Plastic,
                    token: "🍼".to_string(),
                    id: 0,
                    golden: false,
                },
                Item {
                    category: Category::Paper,
                    token: "📰".to_string(),
                    id: 1,
                    golden: false,
                },
            ],
            ..SessionState::default()
        }
    }

    #[test]
    fn perfect_player_always_picks_matching_bin() {
        let state = field();
        let mut player = ScriptedPlayer::new(7, 1.0);
        for _ in 0..50 {
            if let Some(PlayerMove::Drop { item_id, bin }) = player.choose(&state, None) {
                assert!(state.item(item_id).unwrap().belongs_in(bin));
            }
        }
    }

    #[test]
    fn clumsy_player_always_misses() {
        let state = field();
        let mut player = ScriptedPlayer::new(7, 0.0);
        for _ in 0..50 {
            if let Some(PlayerMove::Drop { item_id, bin }) = player.choose(&state, None) {
                assert!(!state.item(item_id).unwrap().belongs_in(bin));
            }
        }
    }

    #[test]
    fn monitor_flags_broken_state() {
        let mut monitor = InvariantMonitor::default();
        assert!(monitor.check(&field()).is_empty());

        let broken = SessionState {
            streak: 4,
            max_streak: 2,
            items_collected: 5,
            ..field()
        };
        let violations = monitor.check(&broken);
        assert!(violations.iter().any(|v| v.contains("max streak")));
        assert!(violations.iter().any(|v| v.contains("collected 5")));
    }

    #[test]
    fn monitor_flags_score_regression() {
        let mut monitor = InvariantMonitor::default();
        let mut state = field();
        state.score = 50;
        assert!(monitor.check(&state).is_empty());
        state.score = 40;
        assert_eq!(monitor.check(&state), vec!["score dropped from 50 to 40"]);
    }
}
