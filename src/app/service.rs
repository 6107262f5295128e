//! Application service — the hexagonal core.
//!
//! [`KettleService`] owns the FSM, the debounced level sensor, and the
//! temperature history. It exposes a clean, hardware-agnostic API. All
//! I/O flows through port traits injected at call sites, making the
//! entire service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────────┐ ──▶ EventSink
//!                 │       KettleService        │
//! ActuatorPort ◀──│  FSM · Debounce · Cutoffs  │
//!   ClockPort ──▶ └────────────────────────────┘
//! ```
//!
//! The service is the single writer of kettle state: commands are drained
//! from the queue and handed to [`handle_command`](KettleService::handle_command)
//! by the control loop itself, so a toggle is atomic with respect to the
//! safety checks. A command sees the level state of the previous tick (at
//! most one tick stale); the tick that follows re-applies every guard.

use log::{debug, info, warn};

use crate::config::KettleConfig;
use crate::control::debounce::{DebouncedLevelSensor, LevelEdge};
use crate::control::history::{TempLog, TempSample};
use crate::fsm::context::{ArmPosition, KettleContext};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};

use super::commands::KettleCommand;
use super::events::{KettleEvent, StatusSnapshot};
use super::ports::{ActuatorPort, ClockPort, EventSink, SensorPort};

/// Firmware version reported in every status snapshot.
const VERSION: &str = env!("CARGO_PKG_VERSION");

// ───────────────────────────────────────────────────────────────
// KettleService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct KettleService {
    fsm: Fsm,
    ctx: KettleContext,
    level: DebouncedLevelSensor,
    history: TempLog,
}

impl KettleService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM — call [`start`](Self::start) next.
    /// The configuration is assumed validated
    /// ([`KettleConfig::validate`]).
    pub fn new(config: KettleConfig) -> Self {
        let level = DebouncedLevelSensor::new(config.debounce_ms);
        let history = TempLog::new(config.temp_record_interval_ms);
        let ctx = KettleContext::new(config);
        let fsm = Fsm::new(build_state_table(), StateId::Idle);

        Self {
            fsm,
            ctx,
            level,
            history,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM and drive the arm to a known OFF position — the
    /// servo may have been left anywhere by a previous power cycle.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        self.ctx.commands.arm_pulse = Some(ArmPosition::Off);
        self.apply_actuators(hw);
        sink.emit(&KettleEvent::Started(self.fsm.current_state()));
        info!("KettleService started in {:?}", self.fsm.current_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle: read sensors → FSM (gating + safety
    /// cutoffs) → history → actuators.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`] — this avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        let now_ms = clock.now_ms();
        self.ctx.now_ms = now_ms;

        // 1. Level sensing (debounced)
        let raw = hw.read_float_switch();
        if let Some(edge) = self.level.sample(raw, now_ms) {
            sink.emit(&KettleEvent::LevelChanged {
                full: edge == LevelEdge::Full,
            });
        }
        self.ctx.sensors.raw_level = raw;
        self.ctx.sensors.kettle_full = self.level.is_full();

        // 2. Temperature
        self.ctx.sensors.temperature_c = hw.read_temperature_c();

        // 3. FSM tick: pump/heat gating in priority order, runtime and
        //    temperature cutoffs.
        let prev_state = self.fsm.current_state();
        self.fsm.tick(&mut self.ctx);
        if let Some(reason) = self.ctx.last_cutoff.take() {
            sink.emit(&KettleEvent::SafetyCutoff(reason));
        }

        // 4. History (at most one sample per recording interval)
        let _ = self
            .history
            .record_if_due(now_ms, clock.time_label(), self.ctx.sensors.temperature_c);

        // 5. Apply actuator commands
        self.apply_actuators(hw);

        // 6. Emit state change if the FSM moved
        let new_state = self.fsm.current_state();
        if new_state != prev_state {
            sink.emit(&KettleEvent::StateChanged {
                from: prev_state,
                to: new_state,
            });
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (drained from the command queue by the
    /// control loop). Refusals leave the state untouched and surface as
    /// [`KettleEvent::CommandRefused`] — never an error (the caller must
    /// not retry without a state change).
    pub fn handle_command(
        &mut self,
        cmd: KettleCommand,
        hw: &mut impl ActuatorPort,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        // Commands arrive between ticks; runtime bookkeeping needs a
        // fresh timestamp.
        self.ctx.now_ms = clock.now_ms();
        let prev_state = self.fsm.current_state();

        match cmd {
            KettleCommand::TogglePump => {
                if prev_state == StateId::Filling {
                    self.fsm.force_transition(StateId::Idle, &mut self.ctx);
                } else if self.ctx.sensors.kettle_full {
                    // DO NOT overfill the kettle and flood the place.
                    warn!("kettle is too full for pump");
                    sink.emit(&KettleEvent::CommandRefused(cmd));
                } else {
                    self.fsm.force_transition(StateId::Filling, &mut self.ctx);
                }
            }

            KettleCommand::ToggleHeat => {
                if prev_state == StateId::Heating {
                    let dest = if self.ctx.sensors.kettle_full {
                        StateId::Full
                    } else {
                        StateId::Idle
                    };
                    self.fsm.force_transition(dest, &mut self.ctx);
                } else if !self.ctx.sensors.kettle_full {
                    warn!("kettle is not full enough for heat");
                    sink.emit(&KettleEvent::CommandRefused(cmd));
                } else {
                    self.fsm.force_transition(StateId::Heating, &mut self.ctx);
                }
            }

            KettleCommand::FillAndHeat => {
                if prev_state == StateId::Heating {
                    // Pending heat never coexists with active heat.
                    debug!("fill-and-heat ignored while already heating");
                } else {
                    self.ctx.pending_heat = true;
                    if self.ctx.sensors.kettle_full {
                        // Nothing to fill; the pending flag fires on the
                        // next tick of the Full state.
                        info!("kettle already full — heat will engage next tick");
                    } else if prev_state != StateId::Filling {
                        self.fsm.force_transition(StateId::Filling, &mut self.ctx);
                    }
                }
            }
        }

        self.apply_actuators(hw);

        let new_state = self.fsm.current_state();
        if new_state != prev_state {
            sink.emit(&KettleEvent::StateChanged {
                from: prev_state,
                to: new_state,
            });
        }

        // Push fresh status to connected clients after every command.
        sink.emit(&KettleEvent::Status(self.status_snapshot(clock)));
    }

    // ── Queries (copied-out projections, never shared references) ──

    /// Build a status snapshot from the current state. Pure read.
    pub fn status_snapshot(&self, clock: &impl ClockPort) -> StatusSnapshot {
        let state = self.fsm.current_state();
        StatusSnapshot {
            pump_on: state == StateId::Filling,
            heat_on: state == StateId::Heating,
            kettle_full: self.ctx.sensors.kettle_full,
            pending_heat: self.ctx.pending_heat,
            temperature_c: self.ctx.sensors.temperature_c,
            datetime: clock.datetime_label(),
            version: VERSION,
        }
    }

    /// Recorded temperature samples, oldest first, at most
    /// [`NUM_TEMP_READINGS`](crate::config::NUM_TEMP_READINGS).
    pub fn history(&self) -> Vec<TempSample> {
        self.history.samples()
    }

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Whether a deferred fill-and-heat request is outstanding.
    pub fn pending_heat(&self) -> bool {
        self.ctx.pending_heat
    }

    // ── Internal ──────────────────────────────────────────────

    /// Translate the context's actuator commands into port calls. The
    /// relay is written before any arm pulse so a fill-to-heat chain
    /// stops the pump before the blocking arm sweep.
    fn apply_actuators(&mut self, hw: &mut impl ActuatorPort) {
        hw.set_pump(self.ctx.commands.pump_on);
        if let Some(pos) = self.ctx.commands.arm_pulse.take() {
            hw.pulse_arm(pos);
        }
    }
}
