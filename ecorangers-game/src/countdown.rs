//! Level countdown modelled as a cancellable once-per-second task.
//!
//! Each arm issues a [`TickHandle`] stamped with a fresh generation. The host
//! event loop delivers ticks with that handle; once the countdown is cancelled
//! or re-armed, every older handle is rejected.

use serde::{Deserialize, Serialize};

/// Token identifying one armed run of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickHandle {
    generation: u64,
}

impl TickHandle {
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Countdown {
    generation: u64,
    armed: bool,
}

impl Countdown {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            generation: 0,
            armed: false,
        }
    }

    /// Start a new run, invalidating any earlier handle.
    pub const fn arm(&mut self) -> TickHandle {
        self.generation = self.generation.wrapping_add(1);
        self.armed = true;
        TickHandle {
            generation: self.generation,
        }
    }

    /// Stop the current run. Returns whether a run was active.
    pub const fn cancel(&mut self) -> bool {
        let was_armed = self.armed;
        if was_armed {
            self.generation = self.generation.wrapping_add(1);
            self.armed = false;
        }
        was_armed
    }

    /// Handle for the live run, if any.
    #[must_use]
    pub const fn active(&self) -> Option<TickHandle> {
        if self.armed {
            Some(TickHandle {
                generation: self.generation,
            })
        } else {
            None
        }
    }

    /// Whether a tick carrying `handle` belongs to the live run.
    #[must_use]
    pub const fn accepts(&self, handle: TickHandle) -> bool {
        self.armed && handle.generation == self.generation
    }
}
