//! GPIO pin assignments for the kettle controller board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.

/// Float switch (liquid level), input with pull-up. HIGH = full.
pub const FLOAT_SWITCH_GPIO: i32 = 25;

/// Pump relay, output. HIGH = pump running.
pub const PUMP_RELAY_GPIO: i32 = 26;

/// Kettle arm servo, LEDC PWM output.
pub const SERVO_GPIO: i32 = 33;

/// 1-Wire bus for the DS18B20 temperature probe.
pub const ONE_WIRE_GPIO: i32 = 32;
