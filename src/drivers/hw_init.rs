//! One-shot hardware peripheral initialization.
//!
//! Configures GPIO directions, the servo LEDC channel, and the 1-Wire
//! bus pin using raw ESP-IDF sys calls. Called once from `main()` before
//! the control loop starts. All helpers have host no-op fallbacks so the
//! rest of the crate compiles and tests off-target.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcInitFailed,
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed => write!(f, "LEDC timer/channel config failed"),
        }
    }
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_gpio_inputs()?;
        init_gpio_outputs()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    // Float switch: pull-up input, HIGH = full. No interrupt — the
    // control loop polls and debounces it.
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::FLOAT_SWITCH_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }

    info!("hw_init: GPIO inputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    false
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    // Pump relay, driven low (pump off) at boot.
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::PUMP_RELAY_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    unsafe { gpio_set_level(pins::PUMP_RELAY_GPIO, 0) };

    info!("hw_init: GPIO outputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs(). Main-loop only.
    unsafe {
        gpio_set_level(pin, if high { 1 } else { 0 });
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── LEDC PWM (servo) ─────────────────────────────────────────

/// Standard hobby-servo frame: 50 Hz, pulse 500–2500 µs over 0–180°.
const SERVO_FREQ_HZ: u32 = 50;
const SERVO_MIN_PULSE_US: u32 = 500;
const SERVO_MAX_PULSE_US: u32 = 2500;
const SERVO_FRAME_US: u32 = 20_000;
/// 14-bit duty resolution → 16383 full-scale.
const SERVO_DUTY_MAX: u32 = (1 << 14) - 1;

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    // SAFETY: Called from single main-task context via init_peripherals().
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_14_BIT,
        freq_hz: SERVO_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    if unsafe { ledc_timer_config(&timer) } != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed);
    }

    let channel = ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: ledc_channel_t_LEDC_CHANNEL_0,
        timer_sel: ledc_timer_t_LEDC_TIMER_0,
        gpio_num: pins::SERVO_GPIO,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    };
    if unsafe { ledc_channel_config(&channel) } != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed);
    }

    info!("hw_init: LEDC configured (servo=CH0 @ {SERVO_FREQ_HZ} Hz)");
    Ok(())
}

/// Duty counts for a servo angle in degrees (0–180).
fn servo_duty_for_angle(angle: u8) -> u32 {
    let span = SERVO_MAX_PULSE_US - SERVO_MIN_PULSE_US;
    let pulse_us = SERVO_MIN_PULSE_US + u32::from(angle.min(180)) * span / 180;
    pulse_us * SERVO_DUTY_MAX / SERVO_FRAME_US
}

#[cfg(target_os = "espidf")]
pub fn servo_set_angle(angle: u8) {
    // SAFETY: LEDC channel 0 was configured in init_ledc(); duty register
    // writes are race-free since only the main loop calls this function.
    unsafe {
        ledc_set_duty(
            ledc_mode_t_LEDC_LOW_SPEED_MODE,
            ledc_channel_t_LEDC_CHANNEL_0,
            servo_duty_for_angle(angle),
        );
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, ledc_channel_t_LEDC_CHANNEL_0);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn servo_set_angle(_angle: u8) {}

// ── 1-Wire (DS18B20) ─────────────────────────────────────────
//
// Bit-banged on a single open-drain GPIO with the external pull-up the
// probe requires anyway. Timings from the DS18B20 datasheet; a blocking
// 750 ms conversion wait matches the probe's 12-bit resolution and the
// synchronous polling model of the control loop.

#[cfg(target_os = "espidf")]
mod onewire {
    use esp_idf_svc::sys::*;

    unsafe fn bus_low(pin: i32) {
        unsafe {
            gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_OUTPUT_OD);
            gpio_set_level(pin, 0);
        }
    }

    unsafe fn bus_release(pin: i32) {
        unsafe {
            gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_INPUT);
        }
    }

    /// Reset pulse; returns true if a device answered with presence.
    unsafe fn reset(pin: i32) -> bool {
        unsafe {
            bus_low(pin);
            ets_delay_us(480);
            bus_release(pin);
            ets_delay_us(70);
            let present = gpio_get_level(pin) == 0;
            ets_delay_us(410);
            present
        }
    }

    unsafe fn write_bit(pin: i32, bit: bool) {
        unsafe {
            bus_low(pin);
            if bit {
                ets_delay_us(6);
                bus_release(pin);
                ets_delay_us(64);
            } else {
                ets_delay_us(60);
                bus_release(pin);
                ets_delay_us(10);
            }
        }
    }

    unsafe fn read_bit(pin: i32) -> bool {
        unsafe {
            bus_low(pin);
            ets_delay_us(6);
            bus_release(pin);
            ets_delay_us(9);
            let bit = gpio_get_level(pin) != 0;
            ets_delay_us(55);
            bit
        }
    }

    unsafe fn write_byte(pin: i32, byte: u8) {
        for i in 0..8 {
            unsafe { write_bit(pin, byte & (1 << i) != 0) };
        }
    }

    unsafe fn read_byte(pin: i32) -> u8 {
        let mut byte = 0u8;
        for i in 0..8 {
            if unsafe { read_bit(pin) } {
                byte |= 1 << i;
            }
        }
        byte
    }

    const CMD_SKIP_ROM: u8 = 0xCC;
    const CMD_CONVERT_T: u8 = 0x44;
    const CMD_READ_SCRATCHPAD: u8 = 0xBE;

    /// Full convert-and-read cycle. `None` when no probe answers.
    pub fn read_celsius(pin: i32) -> Option<f32> {
        // SAFETY: single-threaded main-loop access; the pin is dedicated
        // to the 1-Wire bus and reconfigured between open-drain output
        // and input by the bit primitives above.
        unsafe {
            if !reset(pin) {
                return None;
            }
            write_byte(pin, CMD_SKIP_ROM);
            write_byte(pin, CMD_CONVERT_T);

            // 12-bit conversion time.
            std::thread::sleep(std::time::Duration::from_millis(750));

            if !reset(pin) {
                return None;
            }
            write_byte(pin, CMD_SKIP_ROM);
            write_byte(pin, CMD_READ_SCRATCHPAD);

            let lo = read_byte(pin);
            let hi = read_byte(pin);
            let raw = i16::from_le_bytes([lo, hi]);
            Some(f32::from(raw) / 16.0)
        }
    }
}

#[cfg(target_os = "espidf")]
pub fn ds18b20_read_celsius(pin: i32) -> Option<f32> {
    onewire::read_celsius(pin)
}

#[cfg(not(target_os = "espidf"))]
pub fn ds18b20_read_celsius(_pin: i32) -> Option<f32> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn servo_duty_tracks_pulse_width() {
        // 0° → 500 µs, 90° → 1500 µs, 180° → 2500 µs over a 20 ms frame.
        assert_eq!(servo_duty_for_angle(0), 500 * SERVO_DUTY_MAX / 20_000);
        assert_eq!(servo_duty_for_angle(90), 1500 * SERVO_DUTY_MAX / 20_000);
        assert_eq!(servo_duty_for_angle(180), 2500 * SERVO_DUTY_MAX / 20_000);
        // Out-of-range angles clamp.
        assert_eq!(servo_duty_for_angle(200), servo_duty_for_angle(180));
    }
}
