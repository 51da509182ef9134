//! System configuration parameters
//!
//! All tunable parameters for the SoftBloom flower.  Loaded once at boot
//! (see [`EmbeddedConfig`](crate::adapters::config_source::EmbeddedConfig))
//! and fixed for the lifetime of the process.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::fsm::Mode;
use crate::fsm::transitions::{DwellRange, ROW_SUM_TOLERANCE};

/// Linear sensor-unit range a normalized level is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureRange {
    pub min: f32,
    pub max: f32,
}

/// PWM sub-range an error magnitude is remapped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PwmRange {
    pub lo: u8,
    pub hi: u8,
}

/// Per-channel regulator tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Target pressure for level 0.0 and 1.0 (sensor units).
    pub pressure: PressureRange,
    /// Pump duty range used while inflating.
    pub pump_pwm: PwmRange,
    /// Valve duty range used while venting.
    pub valve_pwm: PwmRange,
    /// Hard ceiling applied to any command on this channel.
    pub max_pwm: u8,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Timing ---
    /// Global time-scale multiplier (> 0).  2.0 runs every behavior twice as fast.
    pub speed_factor: f32,
    /// Delay between control ticks (milliseconds)
    pub tick_interval_ms: u32,
    /// Status snapshot interval (milliseconds)
    pub status_interval_ms: u32,

    // --- Channels ---
    /// Pressure channel driving the flower base.
    pub base: ChannelConfig,
    /// Pressure channel driving the leaves.
    pub leaves: ChannelConfig,

    // --- Mode machine ---
    /// Row-stochastic transition matrix indexed by `Mode as usize`.
    pub transitions: [[f32; Mode::COUNT]; Mode::COUNT],
    /// Per-mode dwell bounds in seconds.
    pub dwell: [DwellRange; Mode::COUNT],
    /// Fixed RNG seed.  `None` draws a seed from the platform at boot.
    pub rng_seed: Option<u64>,

    // --- Output ---
    /// Upper LED brightness bound (0-255).
    pub led_brightness_cap: u8,
    /// Emit mode-entry and status events.
    pub debug_log: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Timing
            speed_factor: 1.0,
            tick_interval_ms: 20,    // 50 Hz
            status_interval_ms: 1000, // 1 Hz

            // Channels
            base: ChannelConfig {
                pressure: PressureRange { min: 20.0, max: 110.0 },
                pump_pwm: PwmRange { lo: 50, hi: 255 },
                valve_pwm: PwmRange { lo: 230, hi: 255 },
                max_pwm: 255,
            },
            leaves: ChannelConfig {
                pressure: PressureRange { min: 20.0, max: 90.0 },
                pump_pwm: PwmRange { lo: 60, hi: 255 },
                valve_pwm: PwmRange { lo: 200, hi: 255 },
                max_pwm: 255,
            },

            // NEUTRAL, CALM, CURIOUS, ANGRY, SAD
            transitions: [
                [0.20, 0.30, 0.25, 0.10, 0.15],
                [0.30, 0.30, 0.20, 0.05, 0.15],
                [0.25, 0.20, 0.25, 0.15, 0.15],
                [0.35, 0.20, 0.10, 0.20, 0.15],
                [0.30, 0.25, 0.10, 0.05, 0.30],
            ],
            dwell: [
                DwellRange::new(8.0, 12.0),
                DwellRange::new(10.0, 15.0),
                DwellRange::new(6.0, 10.0),
                DwellRange::new(10.0, 13.0),
                DwellRange::new(12.0, 18.0),
            ],
            rng_seed: None,

            // Output
            led_brightness_cap: 160,
            debug_log: true,
        }
    }
}

impl SystemConfig {
    /// Range-check every field.  Rejects rather than clamps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.speed_factor.is_finite() && self.speed_factor > 0.0) {
            return Err(ConfigError::ValidationFailed("speed_factor must be > 0"));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick_interval_ms must be > 0"));
        }
        if self.status_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("status_interval_ms must be > 0"));
        }
        self.base.validate()?;
        self.leaves.validate()?;

        for row in &self.transitions {
            if row.iter().any(|p| !(p.is_finite() && *p >= 0.0)) {
                return Err(ConfigError::ValidationFailed(
                    "transitions: probabilities must be non-negative",
                ));
            }
            let sum: f32 = row.iter().sum();
            if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(ConfigError::ValidationFailed("transitions: row must sum to 1"));
            }
        }

        if !self.dwell.iter().all(DwellRange::is_valid) {
            return Err(ConfigError::ValidationFailed("dwell: need 0 < lo <= hi"));
        }
        Ok(())
    }
}

impl ChannelConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let PressureRange { min, max } = self.pressure;
        if !(min.is_finite() && max.is_finite() && min >= 0.0 && min < max) {
            return Err(ConfigError::ValidationFailed("pressure: need 0 <= min < max"));
        }
        if self.pump_pwm.lo > self.pump_pwm.hi {
            return Err(ConfigError::ValidationFailed("pump_pwm: lo > hi"));
        }
        if self.valve_pwm.lo > self.valve_pwm.hi {
            return Err(ConfigError::ValidationFailed("valve_pwm: lo > hi"));
        }
        Ok(())
    }
}
