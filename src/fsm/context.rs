//! Shared mutable context threaded through every state handler.
//!
//! `KettleContext` is the single struct that state handlers read from and
//! write to: the latest sensor snapshot, the actuator commands to apply
//! after the tick, the deferred-heat flag, actuator start timestamps, and
//! configuration. It is owned by the service and mutated only inside the
//! control tick — external readers get copied-out projections, never a
//! reference.

use crate::config::KettleConfig;
use crate::safety::{CutoffReason, SafetyLimits};

// ---------------------------------------------------------------------------
// Sensor snapshot (read-only to state handlers; written by the service)
// ---------------------------------------------------------------------------

/// A point-in-time snapshot of the kettle's sensors.
#[derive(Debug, Clone, Copy, Default)]
pub struct KettleSnapshot {
    /// Debounced level state. `true` = full.
    pub kettle_full: bool,
    /// Raw float-switch level from this tick, pre-debounce.
    pub raw_level: bool,
    /// Latest probe reading (°C). May carry the disconnect sentinel.
    pub temperature_c: f32,
}

// ---------------------------------------------------------------------------
// Actuator commands (written by state handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Discrete positions of the kettle arm. The arm is momentary: it is
/// pulsed to `On` or `Off` and returned to `Neutral` by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmPosition {
    On,
    Neutral,
    Off,
}

/// Commands that state handlers write to request actuator actions.
/// The service applies these to the drivers after each FSM tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActuatorCommands {
    /// Desired pump relay state.
    pub pump_on: bool,
    /// Pending arm pulse, consumed (and cleared) when applied. Each pulse
    /// re-drives the arm even if it already sits at that position.
    pub arm_pulse: Option<ArmPosition>,
}

// ---------------------------------------------------------------------------
// KettleContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct KettleContext {
    // -- Timing --
    /// Monotonic time of the current tick (ms).
    pub now_ms: u64,
    /// Ticks elapsed since the current state was entered.
    pub ticks_in_state: u64,
    /// Monotonic total tick count.
    pub total_ticks: u64,

    // -- Sensor data --
    /// Latest sensor readings. Updated before each FSM tick.
    pub sensors: KettleSnapshot,

    // -- Actuator outputs --
    /// Commands to be applied to actuators after the FSM tick.
    pub commands: ActuatorCommands,

    // -- Deferred heat --
    /// Set by the fill-and-heat command; cleared exactly once when the
    /// kettle transitions to full while set. Never true while heating.
    pub pending_heat: bool,

    // -- Actuator runtime bookkeeping --
    /// When the pump was last switched on (valid while in `Filling`).
    pub pump_started_ms: u64,
    /// When the heat was last engaged (valid while in `Heating`).
    pub heat_started_ms: u64,

    // -- Configuration --
    pub config: KettleConfig,
    /// Runtime limits derived from the config.
    pub limits: SafetyLimits,

    // -- Safety --
    /// Cutoff fired by a handler this tick, drained by the service for
    /// event emission. At most one per tick (pump and heat are mutually
    /// exclusive states).
    pub last_cutoff: Option<CutoffReason>,
}

impl KettleContext {
    pub fn new(config: KettleConfig) -> Self {
        Self {
            now_ms: 0,
            ticks_in_state: 0,
            total_ticks: 0,
            sensors: KettleSnapshot::default(),
            commands: ActuatorCommands::default(),
            pending_heat: false,
            pump_started_ms: 0,
            heat_started_ms: 0,
            limits: SafetyLimits::from_config(&config),
            config,
            last_cutoff: None,
        }
    }
}
