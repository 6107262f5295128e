//! System clock adapter.
//!
//! Monotonic milliseconds for debounce/timeout arithmetic, plus the
//! wall-clock labels shown on the dashboard. `std::time::Instant` is
//! monotonic on both the host and ESP-IDF; the labels come from the
//! local timezone clock (synced externally — time sync itself is not
//! this crate's concern).

use chrono::Local;

use crate::app::ports::ClockPort;

/// Clock backed by the OS monotonic timer and the local wall clock.
pub struct SystemClock {
    start: std::time::Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

impl ClockPort for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn time_label(&self) -> String {
        Local::now().format("%H:%M:%S").to_string()
    }

    fn datetime_label(&self) -> String {
        Local::now().format("%A, %B %d %Y %H:%M").to_string()
    }
}
