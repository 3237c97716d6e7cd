//! Save/resume contract and an in-memory single-slot implementation.
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::StorageError;
use crate::state::{GamePhase, SessionState};

const MILLIS_PER_MINUTE: u64 = 60_000;

/// Deep copy of a session taken when the player saves and quits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSnapshot {
    pub state: SessionState,
    pub saved_at: u64,
}

impl SavedSnapshot {
    #[must_use]
    pub fn capture(state: &SessionState, saved_at: u64) -> Self {
        Self {
            state: state.clone(),
            saved_at,
        }
    }

    /// State to resume play from: unpaused and back in the playing phase.
    #[must_use]
    pub fn into_resumable(self) -> SessionState {
        SessionState {
            is_paused: false,
            phase: GamePhase::Playing,
            ..self.state
        }
    }

    #[must_use]
    pub const fn minutes_ago(&self, now_millis: u64) -> u64 {
        now_millis.saturating_sub(self.saved_at) / MILLIS_PER_MINUTE
    }

    /// Text for the "saved game found" notice on the start screen.
    #[must_use]
    pub fn describe(&self, now_millis: u64) -> String {
        let age = match self.minutes_ago(now_millis) {
            0 => "just now".to_string(),
            1 => "1 minute ago".to_string(),
            minutes => format!("{minutes} minutes ago"),
        };
        format!(
            "Level {} - {} mode (saved {age})",
            self.state.level, self.state.mode
        )
    }
}

/// Marker returned by a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotHandle {
    pub saved_at: u64,
}

/// Trait for abstracting snapshot persistence.
/// Platform-specific implementations should provide this; at most one
/// snapshot is retained and saving replaces it.
pub trait SnapshotStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist `snapshot`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn save(&self, snapshot: &SavedSnapshot) -> Result<SnapshotHandle, Self::Error>;

    /// Load the retained snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored snapshot cannot be read.
    fn load(&self) -> Result<Option<SavedSnapshot>, Self::Error>;

    /// Drop the retained snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be removed.
    fn clear(&self) -> Result<(), Self::Error>;
}

/// Single-slot store holding the snapshot as JSON text, the way browser
/// local storage would. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemorySnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn has_snapshot(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Overwrite the raw slot contents.
    pub fn put_raw(&self, payload: impl Into<String>) {
        *self.slot.borrow_mut() = Some(payload.into());
    }
}

impl SnapshotStore for MemorySnapshotStore {
    type Error = StorageError;

    fn save(&self, snapshot: &SavedSnapshot) -> Result<SnapshotHandle, Self::Error> {
        let payload = serde_json::to_string(snapshot)?;
        *self.slot.borrow_mut() = Some(payload);
        Ok(SnapshotHandle {
            saved_at: snapshot.saved_at,
        })
    }

    fn load(&self) -> Result<Option<SavedSnapshot>, Self::Error> {
        self.slot
            .borrow()
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(StorageError::from)
    }

    fn clear(&self) -> Result<(), Self::Error> {
        self.slot.borrow_mut().take();
        Ok(())
    }
}
