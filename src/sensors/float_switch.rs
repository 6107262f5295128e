//! Float switch liquid-level sensor.
//!
//! A magnetic float closes the contact when liquid reaches the full
//! threshold. Wired to a GPIO configured as a pull-up input; HIGH = full.
//! The raw signal chatters around the threshold — debouncing is the
//! domain's job ([`DebouncedLevelSensor`](crate::control::debounce)),
//! this shim only reads the pin.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the real GPIO level via hw_init helpers.
//! On host/test: reads a static atomic set by `sim_set_float_switch`.

use core::sync::atomic::AtomicBool;
#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::Ordering;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

static SIM_FLOAT_HIGH: AtomicBool = AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_float_switch(high: bool) {
    SIM_FLOAT_HIGH.store(high, Ordering::Relaxed);
}

pub struct FloatSwitch {
    _gpio: i32,
}

impl FloatSwitch {
    pub fn new(gpio: i32) -> Self {
        Self { _gpio: gpio }
    }

    /// Instantaneous raw level. Sampled once per control tick.
    pub fn read(&mut self) -> bool {
        self.read_gpio()
    }

    #[cfg(target_os = "espidf")]
    fn read_gpio(&self) -> bool {
        hw_init::gpio_read(pins::FLOAT_SWITCH_GPIO)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_gpio(&self) -> bool {
        SIM_FLOAT_HIGH.load(Ordering::Relaxed)
    }
}
