//! Bounded temperature history for the dashboard chart.
//!
//! A fixed-capacity ring of `(time label, °C)` samples, appended at most
//! once per recording interval. When full, the oldest sample is evicted —
//! the chart always shows the latest [`NUM_TEMP_READINGS`] readings and
//! memory never grows.

use heapless::HistoryBuffer;
use serde::Serialize;

use crate::config::NUM_TEMP_READINGS;

/// One recorded temperature sample. Serialises to the wire shape the
/// chart renderer expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TempSample {
    /// Clock label at record time, e.g. `14:03:21`.
    #[serde(rename = "timeLabel")]
    pub time_label: String,
    /// Probe reading in Celsius. Fault sentinels are recorded as-is so a
    /// dead probe is visible on the chart.
    #[serde(rename = "temp")]
    pub celsius: f32,
}

/// Rolling window of temperature samples.
pub struct TempLog {
    samples: HistoryBuffer<TempSample, NUM_TEMP_READINGS>,
    interval_ms: u64,
    last_recorded_ms: Option<u64>,
}

impl TempLog {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            samples: HistoryBuffer::new(),
            interval_ms,
            last_recorded_ms: None,
        }
    }

    /// Record a sample if the interval has elapsed since the last one.
    /// The first call always records. Returns whether a sample was taken.
    pub fn record_if_due(&mut self, now_ms: u64, time_label: String, celsius: f32) -> bool {
        if let Some(last) = self.last_recorded_ms {
            if now_ms.saturating_sub(last) < self.interval_ms {
                return false;
            }
        }
        self.last_recorded_ms = Some(now_ms);
        self.samples.write(TempSample { time_label, celsius });
        true
    }

    /// Samples in arrival order, oldest first.
    pub fn samples(&self) -> Vec<TempSample> {
        self.samples.oldest_ordered().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        NUM_TEMP_READINGS
    }
}
