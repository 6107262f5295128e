//! Sensor shims — the float switch and the temperature probe.
//!
//! Each sensor follows the dual-target pattern: real GPIO/1-Wire reads on
//! ESP-IDF, injectable simulation statics on the host so the full stack
//! runs in tests without hardware.

pub mod float_switch;
pub mod temperature;
