//! Concrete state handler functions and table builder.
//!
//! Each state is defined by three plain `fn` pointers — no closures, no
//! dynamic dispatch, no heap. The handlers encode the per-tick priority
//! rules: level first, then pump/heat gating, then the temperature and
//! runtime cutoffs.
//!
//! ```text
//!  IDLE ──[toggle pump / fill+heat]──▶ FILLING
//!    ▲ ▲                                 │
//!    │ │                        [full, pending]──▶ HEATING
//!    │ │                                 │             │
//!    │ └──[pump runtime cutoff]──────────┘  [level drop]│
//!    │                                                  │
//!    │          [full]                                  │
//!  FULL ◀──[target temp / heat cutoff]──────────────────┘
//!    │
//!    └──[pending heat]──▶ HEATING
//!
//!  FILLING ──[full, no pending]──▶ FULL      FULL ──[level drop]──▶ IDLE
//! ```
//!
//! Arm pulses are issued from `on_enter`/`on_exit`, so *every* exit from
//! `Heating` re-asserts the OFF position — the arm is momentary and a
//! redundant OFF pulse is harmless, whereas a missed one leaves the
//! kettle heating.

use super::context::{ArmPosition, KettleContext};
use super::{StateDescriptor, StateId};
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table. Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Idle (not full, pump off, heat off)
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: None,
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1 — Filling (pump on)
        StateDescriptor {
            id: StateId::Filling,
            name: "Filling",
            on_enter: Some(filling_enter),
            on_exit: Some(filling_exit),
            on_update: filling_update,
        },
        // Index 2 — Full (full, pump off, heat off)
        StateDescriptor {
            id: StateId::Full,
            name: "Full",
            on_enter: None,
            on_exit: None,
            on_update: full_update,
        },
        // Index 3 — Heating (arm pulsed on)
        StateDescriptor {
            id: StateId::Heating,
            name: "Heating",
            on_enter: Some(heating_enter),
            on_exit: Some(heating_exit),
            on_update: heating_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state
// ═══════════════════════════════════════════════════════════════════════════

fn idle_update(ctx: &mut KettleContext) -> Option<StateId> {
    // The level can reach full without the pump (manual fill, or a pump
    // timeout that fired while the switch was stuck low). A deferred heat
    // request left armed by an aborted fill fires on the same tick.
    if ctx.sensors.kettle_full {
        if ctx.pending_heat {
            ctx.pending_heat = false;
            return Some(StateId::Heating);
        }
        return Some(StateId::Full);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  FILLING state — pump running until the float switch settles high
// ═══════════════════════════════════════════════════════════════════════════

fn filling_enter(ctx: &mut KettleContext) {
    info!("turning pump on");
    ctx.commands.pump_on = true;
    ctx.pump_started_ms = ctx.now_ms;
}

fn filling_exit(ctx: &mut KettleContext) {
    info!("turning pump off");
    ctx.commands.pump_on = false;
}

fn filling_update(ctx: &mut KettleContext) -> Option<StateId> {
    if ctx.sensors.kettle_full {
        // Full: stop the pump; a deferred heat request fires now, exactly
        // once. The full precondition for heat holds by this branch.
        if ctx.pending_heat {
            ctx.pending_heat = false;
            return Some(StateId::Heating);
        }
        return Some(StateId::Full);
    }

    // Runtime backstop for a stuck float switch, a leak, or a dry run.
    if ctx.limits.pump_overrun(ctx.now_ms, ctx.pump_started_ms) {
        warn!(
            "pump runtime limit hit after {} ms — forcing pump off",
            ctx.now_ms.saturating_sub(ctx.pump_started_ms)
        );
        ctx.last_cutoff = Some(crate::safety::CutoffReason::PumpTimeout);
        return Some(StateId::Idle);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  FULL state — kettle full, nothing actuating
// ═══════════════════════════════════════════════════════════════════════════

fn full_update(ctx: &mut KettleContext) -> Option<StateId> {
    if !ctx.sensors.kettle_full {
        return Some(StateId::Idle);
    }

    // A fill-and-heat issued while already full leaves the flag armed;
    // it fires here on the next tick.
    if ctx.pending_heat {
        ctx.pending_heat = false;
        return Some(StateId::Heating);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  HEATING state — arm pulsed on, watching temperature and runtime
// ═══════════════════════════════════════════════════════════════════════════

fn heating_enter(ctx: &mut KettleContext) {
    info!("turning kettle on");
    ctx.commands.arm_pulse = Some(ArmPosition::On);
    ctx.heat_started_ms = ctx.now_ms;
}

fn heating_exit(ctx: &mut KettleContext) {
    // Unconditional: the arm is re-driven to OFF on every exit, even if a
    // pulse was already queued this tick.
    info!("turning kettle off");
    ctx.commands.arm_pulse = Some(ArmPosition::Off);
}

fn heating_update(ctx: &mut KettleContext) -> Option<StateId> {
    // Level before temperature: heat must never run on a non-full kettle,
    // even if it started full and the level later dropped.
    if !ctx.sensors.kettle_full {
        warn!("level dropped while heating — forcing heat off");
        ctx.last_cutoff = Some(crate::safety::CutoffReason::LevelDropped);
        return Some(StateId::Idle);
    }

    if let Some(reason) =
        ctx.limits
            .heat_cutoff(ctx.now_ms, ctx.heat_started_ms, ctx.sensors.temperature_c)
    {
        match reason {
            crate::safety::CutoffReason::TargetTemperatureReached => {
                info!(
                    "reached {:.1} degC (target {:.1}) — heat off",
                    ctx.sensors.temperature_c, ctx.limits.target_temp_c
                );
            }
            _ => warn!("heat cutoff: {reason}"),
        }
        ctx.last_cutoff = Some(reason);
        return Some(StateId::Full);
    }

    None
}
