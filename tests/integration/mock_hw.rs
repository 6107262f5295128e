//! Mock hardware, clock, and event sink for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO/PWM registers, and exposes a
//! virtual clock so debounce windows and safety timeouts run in
//! microseconds of test time.

use std::cell::Cell;

use brewkettle::app::events::KettleEvent;
use brewkettle::app::ports::{ActuatorPort, ClockPort, EventSink, SensorPort};
use brewkettle::fsm::context::ArmPosition;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    SetPump(bool),
    PulseArm(ArmPosition),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Raw float-switch level fed to the next sensor read.
    pub float_high: bool,
    /// Probe reading fed to the next sensor read.
    pub temperature_c: f32,
    /// Every actuator call, in order.
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            float_high: false,
            temperature_c: 20.0,
            calls: Vec::new(),
        }
    }

    /// Latest commanded pump state.
    pub fn pump_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::SetPump(on) => Some(*on),
                ActuatorCall::PulseArm(_) => None,
            })
            .unwrap_or(false)
    }

    /// Arm pulses in issue order.
    pub fn arm_pulses(&self) -> Vec<ArmPosition> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ActuatorCall::PulseArm(pos) => Some(*pos),
                ActuatorCall::SetPump(_) => None,
            })
            .collect()
    }

    /// Most recent arm pulse, if any.
    pub fn last_arm_pulse(&self) -> Option<ArmPosition> {
        self.arm_pulses().last().copied()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_float_switch(&mut self) -> bool {
        self.float_high
    }

    fn read_temperature_c(&mut self) -> f32 {
        self.temperature_c
    }
}

impl ActuatorPort for MockHardware {
    fn set_pump(&mut self, on: bool) {
        self.calls.push(ActuatorCall::SetPump(on));
    }

    fn pulse_arm(&mut self, pos: ArmPosition) {
        self.calls.push(ActuatorCall::PulseArm(pos));
    }
}

// ── MockClock ─────────────────────────────────────────────────

/// Virtual monotonic clock; tests advance it explicitly.
pub struct MockClock {
    now: Cell<u64>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn new() -> Self {
        Self { now: Cell::new(0) }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for MockClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    fn time_label(&self) -> String {
        let secs = self.now.get() / 1000;
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
    }

    fn datetime_label(&self) -> String {
        format!("Saturday, July 15 2023 {}", self.time_label())
    }
}

// ── Recording event sink ──────────────────────────────────────

pub struct LogSink {
    pub events: Vec<KettleEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn refusals(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, KettleEvent::CommandRefused(_)))
            .count()
    }

    pub fn cutoffs(&self) -> Vec<brewkettle::safety::CutoffReason> {
        self.events
            .iter()
            .filter_map(|e| match e {
                KettleEvent::SafetyCutoff(r) => Some(*r),
                _ => None,
            })
            .collect()
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &KettleEvent) {
        self.events.push(event.clone());
    }
}
