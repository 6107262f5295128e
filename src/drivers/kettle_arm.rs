//! Kettle arm servo driver.
//!
//! The arm is a momentary-contact mechanism: a servo sweeps to the ON or
//! OFF position to press the kettle's power lever, holds there long
//! enough for the mechanism to complete the motion, then returns to
//! neutral. It never parks at ON or OFF.
//!
//! The settle hold **blocks the calling thread** — an accepted bounded
//! stall in the control loop (the safety timeouts are orders of magnitude
//! longer than the pulse). Every pulse re-drives the servo even if the
//! lever is already in that position; a redundant press is harmless, a
//! missed one is not.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the servo via the LEDC PWM helper and really
//! sleeps through the settle window.
//! On host/test: records positions in-memory, without the delay.

use log::debug;

use crate::config::KettleConfig;
use crate::drivers::hw_init;
use crate::fsm::context::ArmPosition;

pub struct KettleArm {
    on_pos: u8,
    neutral_pos: u8,
    off_pos: u8,
    settle_ms: u64,
    /// Last position the servo was commanded to (ends at Neutral after
    /// every pulse).
    current: ArmPosition,
}

impl KettleArm {
    pub fn new(config: &KettleConfig) -> Self {
        Self {
            on_pos: config.arm_on_pos,
            neutral_pos: config.arm_neutral_pos,
            off_pos: config.arm_off_pos,
            settle_ms: config.arm_settle_ms,
            current: ArmPosition::Neutral,
        }
    }

    /// Pulse the arm: sweep to `pos`, hold through the settle window,
    /// return to neutral. Pulsing `Neutral` just re-centres the arm.
    pub fn pulse(&mut self, pos: ArmPosition) {
        self.drive(pos);
        if pos != ArmPosition::Neutral {
            self.settle();
            self.drive(ArmPosition::Neutral);
        }
    }

    /// Where the servo currently sits.
    pub fn position(&self) -> ArmPosition {
        self.current
    }

    fn drive(&mut self, pos: ArmPosition) {
        let angle = match pos {
            ArmPosition::On => self.on_pos,
            ArmPosition::Neutral => self.neutral_pos,
            ArmPosition::Off => self.off_pos,
        };
        debug!("kettle arm -> {pos:?} ({angle} deg)");
        hw_init::servo_set_angle(angle);
        self.current = pos;
    }

    #[cfg(target_os = "espidf")]
    fn settle(&self) {
        std::thread::sleep(std::time::Duration::from_millis(self.settle_ms));
    }

    #[cfg(not(target_os = "espidf"))]
    fn settle(&self) {
        // Host builds skip the mechanical hold.
    }
}
