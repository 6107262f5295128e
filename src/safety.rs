//! Safety cutoffs.
//!
//! The actuator runtime limits are evaluated **every tick inside the state
//! handlers**, independently of the primary control signals they back up:
//!
//! - the pump runtime cutoff guards against a stuck float switch, a leak,
//!   or a dry reservoir;
//! - the heat runtime cutoff guards against a stuck or disconnected
//!   temperature probe;
//! - the probe-fault check catches the disconnect sentinel directly, so a
//!   dead probe drops the heat immediately instead of riding out the
//!   runtime limit.
//!
//! A fired cutoff forces the actuator off and is logged at warn level;
//! it is never fatal (the system returns to an idle state and accepts new
//! commands).

use core::fmt;

/// A DS18B20 reports −127 °C when disconnected; anything at or below this
/// threshold is treated as a probe fault rather than a temperature.
pub const PROBE_FAULT_C: f32 = -100.0;

/// Why an actuator was forced off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutoffReason {
    /// Pump exceeded its maximum continuous runtime.
    PumpTimeout,
    /// Heat exceeded its maximum continuous runtime.
    HeatTimeout,
    /// Liquid reached the heat cutoff target.
    TargetTemperatureReached,
    /// Temperature probe returned the disconnect sentinel.
    ProbeFault,
    /// Liquid level dropped below full while heating.
    LevelDropped,
}

impl fmt::Display for CutoffReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PumpTimeout => write!(f, "pump runtime limit"),
            Self::HeatTimeout => write!(f, "heat runtime limit"),
            Self::TargetTemperatureReached => write!(f, "target temperature reached"),
            Self::ProbeFault => write!(f, "temperature probe fault"),
            Self::LevelDropped => write!(f, "level dropped while heating"),
        }
    }
}

/// True if the reading is the disconnect sentinel rather than a
/// temperature.
pub fn probe_fault(temp_c: f32) -> bool {
    temp_c <= PROBE_FAULT_C
}

/// Runtime limits snapshotted from the configuration.
#[derive(Debug, Clone, Copy)]
pub struct SafetyLimits {
    pub timeout_pump_ms: u64,
    pub timeout_heat_ms: u64,
    pub target_temp_c: f32,
}

impl SafetyLimits {
    pub fn from_config(config: &crate::config::KettleConfig) -> Self {
        Self {
            timeout_pump_ms: config.timeout_pump_ms,
            timeout_heat_ms: config.timeout_heat_ms,
            target_temp_c: config.target_temp_c,
        }
    }

    /// Has the pump been running past its limit?
    pub fn pump_overrun(&self, now_ms: u64, started_ms: u64) -> bool {
        now_ms.saturating_sub(started_ms) >= self.timeout_pump_ms
    }

    /// Should the heat be cut off this tick? Probe faults win over the
    /// target comparison: the sentinel is far below any target and would
    /// otherwise mask the failure until the runtime limit.
    pub fn heat_cutoff(
        &self,
        now_ms: u64,
        started_ms: u64,
        temp_c: f32,
    ) -> Option<CutoffReason> {
        if probe_fault(temp_c) {
            Some(CutoffReason::ProbeFault)
        } else if temp_c >= self.target_temp_c {
            Some(CutoffReason::TargetTemperatureReached)
        } else if now_ms.saturating_sub(started_ms) >= self.timeout_heat_ms {
            Some(CutoffReason::HeatTimeout)
        } else {
            None
        }
    }
}
