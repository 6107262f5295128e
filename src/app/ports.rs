//! Port traits — the hexagonal boundary between domain logic and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ KettleService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, clock, event sinks) implement
//! these traits. The [`KettleService`](super::service::KettleService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::fsm::context::ArmPosition;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain sensor data.
pub trait SensorPort {
    /// Raw float-switch level. `true` = liquid at the full threshold.
    /// Noisy; the domain debounces it.
    fn read_float_switch(&mut self) -> bool;

    /// Latest probe temperature in Celsius. A disconnected probe yields
    /// its sentinel value (handled by the safety layer, not the adapter).
    fn read_temperature_c(&mut self) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    /// Set the pump relay. Implementations only touch the relay on an
    /// actual state change (no redundant switching).
    fn set_pump(&mut self, on: bool);

    /// Pulse the kettle arm: drive `pos`, hold through the settle time,
    /// return to neutral. **Blocks for the settle duration** — a bounded
    /// stall the control loop accepts by design. Every call re-drives the
    /// arm, even to a position it already holds.
    fn pulse_arm(&mut self, pos: ArmPosition);
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: time source → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic time plus human-readable labels for the history chart and
/// status line. Injected so tests can drive a virtual clock.
pub trait ClockPort {
    /// Milliseconds since boot, monotonic.
    fn now_ms(&self) -> u64;

    /// Short clock label for history samples, e.g. `14:03:21`.
    fn time_label(&self) -> String;

    /// Long-form label for the status snapshot,
    /// e.g. `Saturday, July 15 2023 14:03`.
    fn datetime_label(&self) -> String;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured
/// [`KettleEvent`](super::events::KettleEvent)s through this port.
/// Adapters decide where they go (serial log, WebSocket push, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::KettleEvent);
}
