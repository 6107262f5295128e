//! Debounced float-switch level sensing.
//!
//! The float switch is a mechanical contact and chatters around the
//! threshold height. Every raw transition restarts a debounce window; the
//! stable output only follows the raw signal once it has held for longer
//! than the window. A glitch shorter than the window therefore never
//! reaches the rest of the system.
//!
//! If the raw signal flips continuously faster than the window, the stable
//! state freezes at the last settled reading. Accepted limitation.

use log::info;

/// Stable-state transition reported by [`DebouncedLevelSensor::sample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEdge {
    /// Kettle became full.
    Full,
    /// Kettle dropped below full.
    NotFull,
}

/// Converts the raw float-switch signal into a stable full/not-full state.
///
/// Owns the stable state exclusively — everything else reads it through
/// [`is_full`](Self::is_full).
pub struct DebouncedLevelSensor {
    debounce_ms: u64,
    last_raw: bool,
    last_change_ms: u64,
    full: bool,
}

impl DebouncedLevelSensor {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            debounce_ms,
            last_raw: false,
            last_change_ms: 0,
            full: false,
        }
    }

    /// Feed one raw sample. Returns the stable-state transition, if this
    /// sample caused one. Called once per control tick.
    pub fn sample(&mut self, raw: bool, now_ms: u64) -> Option<LevelEdge> {
        if raw != self.last_raw {
            self.last_change_ms = now_ms;
            self.last_raw = raw;
        }

        if now_ms.saturating_sub(self.last_change_ms) > self.debounce_ms && raw != self.full {
            self.full = raw;
            return Some(if raw {
                info!("kettle is full");
                LevelEdge::Full
            } else {
                info!("kettle is low");
                LevelEdge::NotFull
            });
        }

        None
    }

    /// Current stable level state.
    pub fn is_full(&self) -> bool {
        self.full
    }
}
