//! DS18B20 temperature probe on the 1-Wire bus.
//!
//! The probe is polled synchronously once per control tick. A missing or
//! failed probe yields [`DISCONNECTED_C`] — the sensor layer does **not**
//! interpret the sentinel; the safety layer
//! ([`probe_fault`](crate::safety::probe_fault)) decides what it means.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-banged 1-Wire read via hw_init helpers.
//! On host/test: reads a static atomic set by `sim_set_temperature_c`.

use core::sync::atomic::AtomicU32;
#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::Ordering;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

/// Reading reported when the probe is absent or the read fails.
/// Matches the DS18B20 driver convention.
pub const DISCONNECTED_C: f32 = -127.0;

// f32 bits; defaults to 20.0 °C so host runs start at room temperature.
static SIM_TEMP_BITS: AtomicU32 = AtomicU32::new(0x41A0_0000);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temperature_c(celsius: f32) {
    SIM_TEMP_BITS.store(celsius.to_bits(), Ordering::Relaxed);
}

pub struct TemperatureProbe {
    _gpio: i32,
}

impl TemperatureProbe {
    pub fn new(gpio: i32) -> Self {
        Self { _gpio: gpio }
    }

    /// Query the probe and return the latest reading in Celsius.
    pub fn read(&mut self) -> f32 {
        self.read_hw()
    }

    #[cfg(target_os = "espidf")]
    fn read_hw(&self) -> f32 {
        hw_init::ds18b20_read_celsius(pins::ONE_WIRE_GPIO).unwrap_or(DISCONNECTED_C)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_hw(&self) -> f32 {
        f32::from_bits(SIM_TEMP_BITS.load(Ordering::Relaxed))
    }
}
