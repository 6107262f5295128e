//! Pump relay driver.
//!
//! Single GPIO driving the pump relay coil. The driver is a dumb
//! actuator: the overfill guard and the runtime cutoff live in the
//! domain layer, not here.
//!
//! Writes only happen on an actual state change — mechanical relays wear
//! with every switch, and the control loop calls [`set`](PumpRelay::set)
//! on every tick.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real GPIO via hw_init helpers.
//! On host/test: tracks state in-memory only.

use log::debug;

use crate::drivers::hw_init;

pub struct PumpRelay {
    gpio: i32,
    on: bool,
}

impl PumpRelay {
    pub fn new(gpio: i32) -> Self {
        Self { gpio, on: false }
    }

    /// Set the relay state. No-op (no hardware write) if unchanged.
    pub fn set(&mut self, on: bool) {
        if on == self.on {
            return;
        }
        debug!("pump relay -> {}", if on { "ON" } else { "OFF" });
        self.on = on;
        hw_init::gpio_write(self.gpio, on);
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
