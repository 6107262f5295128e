//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the sensor shims and actuator drivers, exposing them through
//! [`SensorPort`] and [`ActuatorPort`]. This is the only module in the
//! system that touches actual hardware. On non-espidf targets, the
//! underlying drivers use cfg-gated simulation stubs.

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::config::KettleConfig;
use crate::drivers::kettle_arm::KettleArm;
use crate::drivers::relay::PumpRelay;
use crate::fsm::context::ArmPosition;
use crate::pins;
use crate::sensors::float_switch::FloatSwitch;
use crate::sensors::temperature::TemperatureProbe;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    float_switch: FloatSwitch,
    probe: TemperatureProbe,
    pump: PumpRelay,
    arm: KettleArm,
}

impl HardwareAdapter {
    /// Build the adapter for this board's pin assignment.
    pub fn from_board(config: &KettleConfig) -> Self {
        Self {
            float_switch: FloatSwitch::new(pins::FLOAT_SWITCH_GPIO),
            probe: TemperatureProbe::new(pins::ONE_WIRE_GPIO),
            pump: PumpRelay::new(pins::PUMP_RELAY_GPIO),
            arm: KettleArm::new(config),
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_float_switch(&mut self) -> bool {
        self.float_switch.read()
    }

    fn read_temperature_c(&mut self) -> f32 {
        self.probe.read()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_pump(&mut self, on: bool) {
        self.pump.set(on);
    }

    fn pulse_arm(&mut self, pos: ArmPosition) {
        self.arm.pulse(pos);
    }
}
