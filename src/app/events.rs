//! Outbound application events and read-only status projections.
//!
//! The [`KettleService`](super::service::KettleService) emits
//! [`KettleEvent`]s through the [`EventSink`](super::ports::EventSink)
//! port; adapters decide where they go (serial log, WebSocket broadcast,
//! etc.). [`StatusSnapshot`] is the copied-out projection the dashboard
//! reads — field names serialise to the wire keys the frontend already
//! consumes.

use serde::Serialize;

use super::commands::KettleCommand;
use crate::fsm::StateId;
use crate::safety::CutoffReason;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum KettleEvent {
    /// The service has started (carries the initial state).
    Started(StateId),

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// The debounced level state changed.
    LevelChanged { full: bool },

    /// A command was refused by a guard (kettle full / not full). The
    /// system state is unchanged; the caller must not retry without a
    /// state change.
    CommandRefused(KettleCommand),

    /// A safety cutoff forced an actuator off.
    SafetyCutoff(CutoffReason),

    /// Fresh status after a processed command, for transports that push
    /// state to connected clients.
    Status(StatusSnapshot),
}

/// Read-only projection of the kettle state, produced on demand.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    /// Pump relay state.
    #[serde(rename = "pump")]
    pub pump_on: bool,
    /// Heat engaged.
    #[serde(rename = "heat")]
    pub heat_on: bool,
    /// Debounced level state.
    #[serde(rename = "kettle")]
    pub kettle_full: bool,
    /// Deferred fill-and-heat request outstanding.
    #[serde(rename = "pendingheat")]
    pub pending_heat: bool,
    /// Latest probe reading (°C).
    #[serde(rename = "tempreading")]
    pub temperature_c: f32,
    /// Wall-clock label at snapshot time.
    #[serde(rename = "datetime")]
    pub datetime: String,
    /// Firmware version.
    #[serde(rename = "version")]
    pub version: &'static str,
}
