//! End-to-end scenarios for the KettleService → FSM → actuator pipeline.
//!
//! These run on the host and drive the full control core through its
//! ports with a virtual clock: debounce windows, safety timeouts, and
//! the composite fill-then-heat command all run in test time.

use crate::mock_hw::{LogSink, MockClock, MockHardware};

use brewkettle::app::commands::KettleCommand;
use brewkettle::app::service::KettleService;
use brewkettle::config::KettleConfig;
use brewkettle::fsm::context::ArmPosition;
use brewkettle::fsm::StateId;
use brewkettle::safety::CutoffReason;

fn make_kettle() -> (KettleService, MockHardware, MockClock, LogSink) {
    let mut svc = KettleService::new(KettleConfig::default());
    let mut hw = MockHardware::new();
    let clock = MockClock::new();
    let mut sink = LogSink::new();
    svc.start(&mut hw, &mut sink);
    (svc, hw, clock, sink)
}

/// Drive the float switch to `high` and tick until the debounce settles
/// (one tick to register the change, one tick past the 50 ms window).
fn settle_level(
    svc: &mut KettleService,
    hw: &mut MockHardware,
    clock: &MockClock,
    sink: &mut LogSink,
    high: bool,
) {
    hw.float_high = high;
    svc.tick(hw, clock, sink);
    clock.advance(60);
    svc.tick(hw, clock, sink);
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boot_drives_arm_to_known_off_position() {
    let (_svc, hw, _clock, _sink) = make_kettle();
    assert_eq!(hw.arm_pulses(), vec![ArmPosition::Off]);
    assert!(!hw.pump_on());
}

// ── Composite fill-and-heat ───────────────────────────────────

#[test]
fn fill_and_heat_full_cycle() {
    let (mut svc, mut hw, clock, mut sink) = make_kettle();

    // Kettle empty: fill starts immediately, heat is deferred.
    svc.handle_command(KettleCommand::FillAndHeat, &mut hw, &clock, &mut sink);
    assert_eq!(svc.state(), StateId::Filling);
    assert!(hw.pump_on());
    assert!(svc.pending_heat());
    let snap = svc.status_snapshot(&clock);
    assert!(snap.pump_on && !snap.heat_on && snap.pending_heat);

    // Float switch held high past the debounce window: pump stops and
    // heat engages in the same pass.
    settle_level(&mut svc, &mut hw, &clock, &mut sink, true);
    assert_eq!(svc.state(), StateId::Heating);
    assert!(!hw.pump_on());
    assert!(!svc.pending_heat());
    assert_eq!(hw.last_arm_pulse(), Some(ArmPosition::On));

    // Temperature reaches the target: heat off.
    hw.temperature_c = 100.0;
    clock.advance(50);
    svc.tick(&mut hw, &clock, &mut sink);
    assert_eq!(svc.state(), StateId::Full);
    assert_eq!(hw.last_arm_pulse(), Some(ArmPosition::Off));
    assert_eq!(sink.cutoffs(), vec![CutoffReason::TargetTemperatureReached]);
}

#[test]
fn fill_and_heat_is_idempotent() {
    let (mut svc, mut hw, clock, mut sink) = make_kettle();

    svc.handle_command(KettleCommand::FillAndHeat, &mut hw, &clock, &mut sink);
    svc.handle_command(KettleCommand::FillAndHeat, &mut hw, &clock, &mut sink);
    assert_eq!(svc.state(), StateId::Filling);
    assert!(svc.pending_heat());

    settle_level(&mut svc, &mut hw, &clock, &mut sink, true);
    assert_eq!(svc.state(), StateId::Heating);

    // Exactly one heat engagement despite the duplicate request.
    let on_pulses = hw
        .arm_pulses()
        .iter()
        .filter(|p| **p == ArmPosition::On)
        .count();
    assert_eq!(on_pulses, 1);
}

#[test]
fn fill_and_heat_on_already_full_kettle_skips_filling() {
    let (mut svc, mut hw, clock, mut sink) = make_kettle();
    settle_level(&mut svc, &mut hw, &clock, &mut sink, true);
    assert_eq!(svc.state(), StateId::Full);

    svc.handle_command(KettleCommand::FillAndHeat, &mut hw, &clock, &mut sink);
    assert!(!hw.pump_on(), "no filling on a full kettle");
    assert!(svc.pending_heat());

    clock.advance(50);
    svc.tick(&mut hw, &clock, &mut sink);
    assert_eq!(svc.state(), StateId::Heating);
    assert!(!svc.pending_heat());
}

#[test]
fn fill_and_heat_ignored_while_heating() {
    let (mut svc, mut hw, clock, mut sink) = make_kettle();
    settle_level(&mut svc, &mut hw, &clock, &mut sink, true);
    svc.handle_command(KettleCommand::ToggleHeat, &mut hw, &clock, &mut sink);
    assert_eq!(svc.state(), StateId::Heating);

    svc.handle_command(KettleCommand::FillAndHeat, &mut hw, &clock, &mut sink);
    assert!(
        !svc.pending_heat(),
        "pending heat must never coexist with active heat"
    );
    assert_eq!(svc.state(), StateId::Heating);
}

// ── Guards ────────────────────────────────────────────────────

#[test]
fn overfill_guard_refuses_pump_on_full_kettle() {
    let (mut svc, mut hw, clock, mut sink) = make_kettle();
    settle_level(&mut svc, &mut hw, &clock, &mut sink, true);
    assert_eq!(svc.state(), StateId::Full);

    svc.handle_command(KettleCommand::TogglePump, &mut hw, &clock, &mut sink);
    assert_eq!(sink.refusals(), 1);
    assert!(!hw.pump_on());
    assert_eq!(svc.state(), StateId::Full, "refusal leaves state unchanged");
}

#[test]
fn dry_heat_guard_refuses_heat_on_empty_kettle() {
    let (mut svc, mut hw, clock, mut sink) = make_kettle();

    svc.handle_command(KettleCommand::ToggleHeat, &mut hw, &clock, &mut sink);
    assert_eq!(sink.refusals(), 1);
    assert_eq!(svc.state(), StateId::Idle);
    assert!(
        !hw.arm_pulses().contains(&ArmPosition::On),
        "heat must never engage on an empty kettle"
    );
}

// ── Manual toggles ────────────────────────────────────────────

#[test]
fn toggle_pump_starts_then_stops() {
    let (mut svc, mut hw, clock, mut sink) = make_kettle();

    svc.handle_command(KettleCommand::TogglePump, &mut hw, &clock, &mut sink);
    assert_eq!(svc.state(), StateId::Filling);
    assert!(hw.pump_on());

    svc.handle_command(KettleCommand::TogglePump, &mut hw, &clock, &mut sink);
    assert_eq!(svc.state(), StateId::Idle);
    assert!(!hw.pump_on());
    assert_eq!(sink.refusals(), 0);
}

#[test]
fn toggle_heat_on_full_kettle_then_off() {
    let (mut svc, mut hw, clock, mut sink) = make_kettle();
    settle_level(&mut svc, &mut hw, &clock, &mut sink, true);

    svc.handle_command(KettleCommand::ToggleHeat, &mut hw, &clock, &mut sink);
    assert_eq!(svc.state(), StateId::Heating);
    assert_eq!(hw.last_arm_pulse(), Some(ArmPosition::On));

    svc.handle_command(KettleCommand::ToggleHeat, &mut hw, &clock, &mut sink);
    assert_eq!(svc.state(), StateId::Full);
    assert_eq!(hw.last_arm_pulse(), Some(ArmPosition::Off));
    assert_eq!(sink.refusals(), 0);
}

// ── Safety timeouts ───────────────────────────────────────────

#[test]
fn pump_times_out_when_float_never_asserts() {
    let (mut svc, mut hw, clock, mut sink) = make_kettle();
    let timeout = KettleConfig::default().timeout_pump_ms;

    svc.handle_command(KettleCommand::TogglePump, &mut hw, &clock, &mut sink);
    assert!(hw.pump_on());

    // Just under the limit: still filling.
    clock.advance(timeout - 1);
    svc.tick(&mut hw, &clock, &mut sink);
    assert_eq!(svc.state(), StateId::Filling);

    // Past the limit: forced off, warning event emitted.
    clock.advance(2);
    svc.tick(&mut hw, &clock, &mut sink);
    assert_eq!(svc.state(), StateId::Idle);
    assert!(!hw.pump_on());
    assert_eq!(sink.cutoffs(), vec![CutoffReason::PumpTimeout]);
}

#[test]
fn heat_times_out_when_target_never_reached() {
    let (mut svc, mut hw, clock, mut sink) = make_kettle();
    let timeout = KettleConfig::default().timeout_heat_ms;

    settle_level(&mut svc, &mut hw, &clock, &mut sink, true);
    svc.handle_command(KettleCommand::ToggleHeat, &mut hw, &clock, &mut sink);
    hw.temperature_c = 30.0; // never approaches the 100 °C target

    clock.advance(timeout + 1);
    svc.tick(&mut hw, &clock, &mut sink);
    assert_eq!(svc.state(), StateId::Full);
    assert_eq!(hw.last_arm_pulse(), Some(ArmPosition::Off));
    assert_eq!(sink.cutoffs(), vec![CutoffReason::HeatTimeout]);
}

#[test]
fn heat_stops_when_level_drops_mid_heat() {
    let (mut svc, mut hw, clock, mut sink) = make_kettle();
    settle_level(&mut svc, &mut hw, &clock, &mut sink, true);
    svc.handle_command(KettleCommand::ToggleHeat, &mut hw, &clock, &mut sink);
    assert_eq!(svc.state(), StateId::Heating);

    // Leak/evaporation: the float switch settles low again.
    settle_level(&mut svc, &mut hw, &clock, &mut sink, false);
    assert_eq!(svc.state(), StateId::Idle);
    assert_eq!(hw.last_arm_pulse(), Some(ArmPosition::Off));
    assert!(sink.cutoffs().contains(&CutoffReason::LevelDropped));
}

#[test]
fn disconnected_probe_cuts_heat_immediately() {
    let (mut svc, mut hw, clock, mut sink) = make_kettle();
    settle_level(&mut svc, &mut hw, &clock, &mut sink, true);
    svc.handle_command(KettleCommand::ToggleHeat, &mut hw, &clock, &mut sink);

    hw.temperature_c = -127.0; // DS18B20 disconnect sentinel
    clock.advance(50);
    svc.tick(&mut hw, &clock, &mut sink);
    assert_eq!(svc.state(), StateId::Full);
    assert_eq!(sink.cutoffs(), vec![CutoffReason::ProbeFault]);
}

#[test]
fn pending_heat_survives_pump_timeout() {
    let (mut svc, mut hw, clock, mut sink) = make_kettle();
    let timeout = KettleConfig::default().timeout_pump_ms;

    svc.handle_command(KettleCommand::FillAndHeat, &mut hw, &clock, &mut sink);
    clock.advance(timeout + 1);
    svc.tick(&mut hw, &clock, &mut sink);
    assert_eq!(svc.state(), StateId::Idle);
    assert!(svc.pending_heat(), "deferred request stays armed");

    // Manual fill later: the deferred heat still fires.
    settle_level(&mut svc, &mut hw, &clock, &mut sink, true);
    assert_eq!(svc.state(), StateId::Heating);
    assert!(!svc.pending_heat());
}

// ── Debounce behaviour through the full stack ─────────────────

#[test]
fn level_glitch_shorter_than_window_is_ignored() {
    let (mut svc, mut hw, clock, mut sink) = make_kettle();
    svc.handle_command(KettleCommand::TogglePump, &mut hw, &clock, &mut sink);

    // 30 ms blip on the float switch while filling.
    hw.float_high = true;
    svc.tick(&mut hw, &clock, &mut sink);
    clock.advance(30);
    hw.float_high = false;
    svc.tick(&mut hw, &clock, &mut sink);
    clock.advance(30);
    svc.tick(&mut hw, &clock, &mut sink);

    assert_eq!(svc.state(), StateId::Filling, "blip must not stop the fill");
    assert!(hw.pump_on());
}

#[test]
fn level_transition_emits_exactly_one_event() {
    let (mut svc, mut hw, clock, mut sink) = make_kettle();
    settle_level(&mut svc, &mut hw, &clock, &mut sink, true);

    // More ticks at the same level produce no further level events.
    for _ in 0..5 {
        clock.advance(50);
        svc.tick(&mut hw, &clock, &mut sink);
    }

    let level_events = sink
        .events
        .iter()
        .filter(|e| matches!(e, brewkettle::app::events::KettleEvent::LevelChanged { .. }))
        .count();
    assert_eq!(level_events, 1);
}

// ── Observability ─────────────────────────────────────────────

#[test]
fn status_snapshot_carries_clock_and_version() {
    let (mut svc, mut hw, clock, mut sink) = make_kettle();
    hw.temperature_c = 42.5;
    clock.set(3_600_000); // 01:00:00
    svc.tick(&mut hw, &clock, &mut sink);

    let snap = svc.status_snapshot(&clock);
    assert_eq!(snap.temperature_c, 42.5);
    assert_eq!(snap.datetime, "Saturday, July 15 2023 01:00:00");
    assert_eq!(snap.version, env!("CARGO_PKG_VERSION"));
}

#[test]
fn history_samples_carry_clock_labels() {
    let (mut svc, mut hw, clock, mut sink) = make_kettle();
    hw.temperature_c = 21.0;
    svc.tick(&mut hw, &clock, &mut sink);

    clock.advance(15_000);
    hw.temperature_c = 25.0;
    svc.tick(&mut hw, &clock, &mut sink);

    let history = svc.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].time_label, "00:00:00");
    assert_eq!(history[1].time_label, "00:00:15");
    assert_eq!(history[1].celsius, 25.0);
}

// ── Command queue wiring ──────────────────────────────────────
//
// The only test in this binary that touches the process-wide queue.

#[test]
fn commands_flow_through_the_queue() {
    let (mut svc, mut hw, clock, mut sink) = make_kettle();

    assert!(brewkettle::command_queue::push_command(KettleCommand::TogglePump));
    brewkettle::command_queue::drain_commands(|cmd| {
        svc.handle_command(cmd, &mut hw, &clock, &mut sink);
    });

    assert_eq!(svc.state(), StateId::Filling);
    assert!(brewkettle::command_queue::queue_is_empty());
}
