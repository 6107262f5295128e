//! System configuration parameters
//!
//! All tunable parameters for the kettle controller. Values mirror the
//! board's deployed settings; `validate()` runs once at startup so an
//! out-of-range deployment fails before the control loop ever ticks.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Temperature history ring capacity. Compile-time because it sizes the
/// `heapless::HistoryBuffer` backing the chart data.
pub const NUM_TEMP_READINGS: usize = 30;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KettleConfig {
    // --- Temperature (Celsius) ---
    /// Preheat target. Defined for parity with the deployed settings file;
    /// no command consumes it yet.
    pub target_preheat_c: f32,
    /// Heat cutoff target.
    pub target_temp_c: f32,

    // --- Safety timeouts ---
    /// Maximum continuous pump runtime (ms) — backup for a faulty float
    /// switch, a leak, or a dry reservoir.
    pub timeout_pump_ms: u64,
    /// Maximum continuous heat runtime (ms) — backup for a stuck or
    /// disconnected temperature probe.
    pub timeout_heat_ms: u64,

    // --- Level sensing ---
    /// Float switch debounce window (ms).
    pub debounce_ms: u64,

    // --- History ---
    /// Minimum spacing between recorded temperature samples (ms).
    pub temp_record_interval_ms: u64,

    // --- Timing ---
    /// Control loop interval (ms). Lower bound only: an arm pulse stalls
    /// the loop for `arm_settle_ms` on top of this.
    pub control_loop_interval_ms: u64,

    // --- Kettle arm servo positions (degrees) ---
    /// Arm position that presses the kettle's power lever ON.
    pub arm_on_pos: u8,
    /// Resting position between pulses.
    pub arm_neutral_pos: u8,
    /// Arm position that presses the lever OFF.
    pub arm_off_pos: u8,
    /// How long the arm is held at ON/OFF before returning to neutral (ms).
    pub arm_settle_ms: u64,
}

impl Default for KettleConfig {
    fn default() -> Self {
        Self {
            // Temperature
            target_preheat_c: 60.0,
            target_temp_c: 100.0,

            // Safety timeouts
            timeout_pump_ms: 300_000, // 5 min
            timeout_heat_ms: 540_000, // 9 min

            // Level sensing
            debounce_ms: 50,

            // History
            temp_record_interval_ms: 15_000,

            // Timing
            control_loop_interval_ms: 50,

            // Kettle arm — values tuned to this servo, mount, and kettle
            arm_on_pos: 74,
            arm_neutral_pos: 50,
            arm_off_pos: 32,
            arm_settle_ms: 250,
        }
    }
}

impl KettleConfig {
    /// Range-check the configuration. Called once at startup; a failure
    /// here is a deployment error, not a runtime condition.
    pub fn validate(&self) -> Result<(), Error> {
        if !(0.0..=110.0).contains(&self.target_temp_c) {
            return Err(Error::Config("target_temp_c out of range (0..=110)"));
        }
        if !(0.0..=110.0).contains(&self.target_preheat_c) {
            return Err(Error::Config("target_preheat_c out of range (0..=110)"));
        }
        if self.timeout_pump_ms == 0 {
            return Err(Error::Config("timeout_pump_ms must be non-zero"));
        }
        if self.timeout_heat_ms == 0 {
            return Err(Error::Config("timeout_heat_ms must be non-zero"));
        }
        if self.debounce_ms == 0 {
            return Err(Error::Config("debounce_ms must be non-zero"));
        }
        if self.temp_record_interval_ms < self.control_loop_interval_ms {
            return Err(Error::Config(
                "temp_record_interval_ms shorter than the control loop interval",
            ));
        }
        if self.control_loop_interval_ms == 0 {
            return Err(Error::Config("control_loop_interval_ms must be non-zero"));
        }
        if self.arm_on_pos > 180 || self.arm_neutral_pos > 180 || self.arm_off_pos > 180 {
            return Err(Error::Config("arm position exceeds 180 degrees"));
        }
        if self.arm_on_pos == self.arm_off_pos {
            return Err(Error::Config("arm_on_pos and arm_off_pos coincide"));
        }
        if self.arm_settle_ms == 0 {
            return Err(Error::Config("arm_settle_ms must be non-zero"));
        }
        Ok(())
    }
}
