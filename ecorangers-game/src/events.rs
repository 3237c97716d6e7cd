//! Input events consumed by the session and signals it emits back.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::catalog::SpecialMode;
use crate::category::Category;
use crate::result::LevelSummary;
use crate::state::GameMode;

/// Discrete player intents delivered by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    DragItemToBin { item_id: u32, bin: Category },
    PauseToggle,
    ModeSelect { mode: GameMode },
    StartGame,
    ResumeSaved,
    NextLevel,
    RestartLevel,
    QuitToMenu,
    SaveAndQuit,
    RestartGame,
    ToggleSound,
}

impl InputEvent {
    /// Build a drop event from a raw bin name; unknown names yield `None`.
    #[must_use]
    pub fn drag(item_id: u32, bin: &str) -> Option<Self> {
        bin.parse::<Category>()
            .ok()
            .map(|bin| Self::DragItemToBin { item_id, bin })
    }

    /// Map a keyboard shortcut to an event given the current pause state.
    #[must_use]
    pub fn from_shortcut(key: &str, paused: bool) -> Option<Self> {
        match key {
            "Escape" | "p" | "P" => Some(Self::PauseToggle),
            "m" | "M" => Some(Self::ToggleSound),
            "q" | "Q" if paused => Some(Self::SaveAndQuit),
            "r" | "R" if paused => Some(Self::RestartLevel),
            _ => None,
        }
    }
}

/// User-visible notices that are not tied to a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    Saved,
    SaveFailed,
    Resumed,
    NoSavedGame,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Saved => write!(f, "Game Saved! 💾"),
            Notice::SaveFailed => write!(f, "Save failed"),
            Notice::Resumed => write!(f, "🎮 Game Resumed!"),
            Notice::NoSavedGame => write!(f, "No saved game found"),
        }
    }
}

/// Observable consequence of a state-machine operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    ButtonClick,
    Sorted {
        item_id: u32,
        points: u64,
        golden: bool,
    },
    Missorted {
        item_id: u32,
        bin: Category,
    },
    StreakMilestone {
        streak: u32,
    },
    TimeBonus {
        seconds: u32,
        streak: u32,
    },
    HurryUp,
    SpecialModeActivated(SpecialMode),
    LevelComplete(Box<LevelSummary>),
    GameComplete,
    SoundToggled {
        enabled: bool,
    },
    Notice(Notice),
}

/// Signals emitted by one operation; usually only a handful.
pub type SignalSet = SmallVec<[Signal; 4]>;

/// Sound effects the audio collaborator knows how to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AudioCue {
    ButtonClick,
    CorrectSort,
    WrongSort,
    GoldenItem,
    Streak,
    LevelComplete,
}

/// Translate signals into the sound effects that accompany them.
///
/// A golden sort plays the golden chime, a milestone sort the streak
/// chord, and any other correct sort the plain chord.
#[must_use]
pub fn audio_cues(signals: &[Signal]) -> SmallVec<[AudioCue; 4]> {
    let milestone = signals
        .iter()
        .any(|signal| matches!(signal, Signal::StreakMilestone { .. }));
    signals
        .iter()
        .filter_map(|signal| match signal {
            Signal::ButtonClick => Some(AudioCue::ButtonClick),
            Signal::Sorted { golden: true, .. } => Some(AudioCue::GoldenItem),
            Signal::Sorted { .. } if milestone => Some(AudioCue::Streak),
            Signal::Sorted { .. } => Some(AudioCue::CorrectSort),
            Signal::Missorted { .. } => Some(AudioCue::WrongSort),
            Signal::TimeBonus { .. } | Signal::LevelComplete(_) | Signal::GameComplete => {
                Some(AudioCue::LevelComplete)
            }
            Signal::SoundToggled { enabled: true } => Some(AudioCue::ButtonClick),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_rejects_unknown_bins() {
        assert_eq!(
            InputEvent::drag(3, "glass"),
            Some(InputEvent::DragItemToBin {
                item_id: 3,
                bin: Category::Glass
            })
        );
        assert_eq!(InputEvent::drag(3, "compost-heap"), None);
    }

    #[test]
    fn shortcuts_respect_pause_state() {
        assert_eq!(
            InputEvent::from_shortcut("Escape", false),
            Some(InputEvent::PauseToggle)
        );
        assert_eq!(InputEvent::from_shortcut("q", false), None);
        assert_eq!(
            InputEvent::from_shortcut("Q", true),
            Some(InputEvent::SaveAndQuit)
        );
        assert_eq!(
            InputEvent::from_shortcut("r", true),
            Some(InputEvent::RestartLevel)
        );
        assert_eq!(InputEvent::from_shortcut("x", true), None);
    }

    #[test]
    fn milestone_sort_plays_streak_instead_of_plain_chord() {
        let signals = [
            Signal::Sorted {
                item_id: 1,
                points: 10,
                golden: false,
            },
            Signal::StreakMilestone { streak: 5 },
        ];
        assert_eq!(audio_cues(&signals).as_slice(), &[AudioCue::Streak]);

        let golden = [
            Signal::Sorted {
                item_id: 2,
                points: 30,
                golden: true,
            },
            Signal::StreakMilestone { streak: 10 },
            Signal::TimeBonus {
                seconds: 4,
                streak: 10,
            },
        ];
        assert_eq!(
            audio_cues(&golden).as_slice(),
            &[AudioCue::GoldenItem, AudioCue::LevelComplete]
        );
    }
}
