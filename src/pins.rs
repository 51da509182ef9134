//! GPIO / peripheral pin assignments for the SoftBloom controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Base channel (pump + bleed valve)
// ---------------------------------------------------------------------------

/// LEDC PWM output driving the base pump MOSFET.
pub const BASE_PUMP_PWM_GPIO: i32 = 1;
/// LEDC PWM output driving the base solenoid valve.
pub const BASE_VALVE_PWM_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Leaves channel (pump + bleed valve)
// ---------------------------------------------------------------------------

pub const LEAVES_PUMP_PWM_GPIO: i32 = 3;
pub const LEAVES_VALVE_PWM_GPIO: i32 = 4;

/// Pump PWM frequency (above audible range).
pub const PUMP_PWM_FREQ_HZ: u32 = 25_000;
/// Solenoid valves do not open reliably at high PWM frequencies.
pub const VALVE_PWM_FREQ_HZ: u32 = 1_000;

// ---------------------------------------------------------------------------
// Pressure sensors: Analog (ADC1)
// ---------------------------------------------------------------------------

/// Base chamber pressure transducer, ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const BASE_PRESSURE_ADC_GPIO: i32 = 5;
/// Leaves chamber pressure transducer, ADC1 channel 5 (GPIO 6 on ESP32-S3).
pub const LEAVES_PRESSURE_ADC_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// LED ring (WS2812B)
// ---------------------------------------------------------------------------

/// Data line of the LED ring, driven by RMT channel 0.
pub const LED_RING_DATA_GPIO: i32 = 8;
/// Number of pixels on the ring.
pub const LED_RING_PIXELS: usize = 12;
