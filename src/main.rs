//! Brewing kettle controller — main entry point.
//!
//! Hexagonal architecture with a synchronous control loop:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                   │
//! │                                                            │
//! │  HardwareAdapter        SystemClock        LogEventSink    │
//! │  (Sensor+Actuator)      (ClockPort)        (EventSink)     │
//! │                                                            │
//! │  ─────────────── Port Trait Boundary ──────────────────    │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │            KettleService (pure logic)                │  │
//! │  │  FSM · Level debounce · Safety cutoffs · History     │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The dashboard transport (HTTP/WebSocket, out of scope here) interacts
//! with the core in exactly two ways: it pushes commands through
//! [`command_queue::push_command`] and reads copied-out snapshots via
//! [`KettleService::status_snapshot`] / [`KettleService::history`]. The
//! loop below is the single writer of kettle state.

#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::Result;
use log::info;

use brewkettle::adapters::hardware::HardwareAdapter;
use brewkettle::adapters::log_sink::LogEventSink;
use brewkettle::adapters::time::SystemClock;
use brewkettle::app::service::KettleService;
use brewkettle::command_queue;
use brewkettle::config::KettleConfig;
use brewkettle::drivers::hw_init;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("TipsyBrew Kettle v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        // In production this triggers the watchdog reset after timeout.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. Configuration ──────────────────────────────────────
    // Out-of-range values are a deployment error; refuse to start.
    let config = KettleConfig::default();
    config.validate()?;

    // ── 4. Wire the core to its adapters ──────────────────────
    let clock = SystemClock::new();
    let mut hw = HardwareAdapter::from_board(&config);
    let mut sink = LogEventSink::new();
    let tick_interval = Duration::from_millis(config.control_loop_interval_ms);

    let mut service = KettleService::new(config);
    service.start(&mut hw, &mut sink);

    // ── 5. Control loop ───────────────────────────────────────
    // Single writer: commands are drained here, at the top of each
    // iteration, so every toggle is followed by a full safety pass
    // within the same interval.
    info!("control loop starting ({} ms interval)", tick_interval.as_millis());
    loop {
        command_queue::drain_commands(|cmd| {
            service.handle_command(cmd, &mut hw, &clock, &mut sink);
        });

        service.tick(&mut hw, &clock, &mut sink);

        std::thread::sleep(tick_interval);
    }
}
