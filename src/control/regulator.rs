//! Closed-loop pressure regulator (one instance per channel).
//!
//! Converts a normalized target level into a pump *or* valve command
//! using the channel's latest sensor reading:
//!
//! ```text
//!   error = reading - target
//!
//!   ◀── inflate ──┤  hold  ├── vent ──▶
//!   pump = f(|e|)  -10   +10  valve = f(e)
//! ```
//!
//! The output is an [`Actuation`], so inflating and venting at the same
//! time cannot be expressed at all.

use crate::config::{ChannelConfig, PwmRange};

/// Half-width of the hold band around the setpoint (sensor units).
pub const DEADBAND: f32 = 10.0;

/// What a channel should do this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actuation {
    /// Run the pump at the given duty, valve closed.
    Inflate(u8),
    /// Open the valve at the given duty, pump off.
    Vent(u8),
    /// Both actuators off.
    Hold,
}

impl Actuation {
    /// `(pump, valve)` duty pair.  At most one side is nonzero.
    pub fn duties(self) -> (u8, u8) {
        match self {
            Self::Inflate(pwm) => (pwm, 0),
            Self::Vent(pwm) => (0, pwm),
            Self::Hold => (0, 0),
        }
    }
}

/// Diagnostic memory of the last regulation step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelState {
    pub last_level: f32,
    /// Duty of whichever actuator was driven (0 on hold).
    pub last_pwm: u8,
    pub valve_open: bool,
}

/// Hysteretic pump/valve regulator for a single pressure channel.
#[derive(Debug, Clone)]
pub struct PressureRegulator {
    config: ChannelConfig,
    state: ChannelState,
}

impl PressureRegulator {
    pub fn new(config: ChannelConfig) -> Self {
        Self {
            config,
            state: ChannelState::default(),
        }
    }

    /// Physical target for a normalized level.
    pub fn target_pressure(&self, level: f32) -> f32 {
        let range = self.config.pressure;
        range.min + (range.max - range.min) * clamp_level(level)
    }

    /// Compute the actuation for `level` given the current `reading`.
    pub fn regulate(&mut self, level: f32, reading: u16) -> Actuation {
        let level = clamp_level(level);
        let error = f32::from(reading) - self.target_pressure(level);

        let actuation = if error < -DEADBAND {
            Actuation::Inflate(self.remap(-error, self.config.pump_pwm))
        } else if error > DEADBAND {
            Actuation::Vent(self.remap(error, self.config.valve_pwm))
        } else {
            Actuation::Hold
        };

        self.state = ChannelState {
            last_level: level,
            last_pwm: match actuation {
                Actuation::Inflate(pwm) | Actuation::Vent(pwm) => pwm,
                Actuation::Hold => 0,
            },
            valve_open: matches!(actuation, Actuation::Vent(pwm) if pwm > 0),
        };
        actuation
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Linear map of `magnitude ∈ [0, max pressure]` into `range`, then capped.
    fn remap(&self, magnitude: f32, range: PwmRange) -> u8 {
        let full_scale = self.config.pressure.max;
        let fraction = if full_scale > 0.0 {
            (magnitude / full_scale).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let span = f32::from(range.hi) - f32::from(range.lo);
        let pwm = f32::from(range.lo) + span * fraction;
        (pwm as u8).min(self.config.max_pwm)
    }
}

fn clamp_level(level: f32) -> f32 {
    if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) }
}
