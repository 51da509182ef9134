//! Behavior orchestrator.
//!
//! Per tick: look up the active mode's behavior, evaluate it at the
//! tick's clock, feed each level and the channel's fresh reading into
//! that channel's regulator, and forward the LED signal.
//!
//! ```text
//!  EngineState ─▶ behavior table ─▶ (base, leaves, visual)
//!                                      │      │       └──▶ LedPort
//!                 SensorPort ──▶ regulator  regulator
//!                                      └──────┴──▶ ActuatorPort
//! ```
//!
//! The only state here is each regulator's own [`ChannelState`].

use crate::config::SystemConfig;
use crate::control::regulator::{Actuation, ChannelState, PressureRegulator};
use crate::fsm::Mode;
use crate::fsm::behaviors::{BehaviorDescriptor, BehaviorInput, BehaviorOutput, build_behavior_table};
use crate::fsm::context::{ChannelId, EngineState, PressureSnapshot};

use super::events::ChannelTelemetry;
use super::ports::{ActuatorPort, LedPort, SensorPort};

/// Outcome of one orchestration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub base: ChannelTelemetry,
    pub leaves: ChannelTelemetry,
}

pub struct Orchestrator {
    behaviors: [BehaviorDescriptor; Mode::COUNT],
    base: PressureRegulator,
    leaves: PressureRegulator,
}

impl Orchestrator {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            behaviors: build_behavior_table(),
            base: PressureRegulator::new(config.base),
            leaves: PressureRegulator::new(config.leaves),
        }
    }

    /// Evaluate the active behavior without touching any regulator.
    pub fn evaluate(&self, state: &EngineState, now_ms: u64) -> BehaviorOutput {
        let input = BehaviorInput {
            t_ms: now_ms,
            speed_factor: state.speed_factor,
        };
        (self.behaviors[state.current_mode as usize].compute)(&input)
    }

    /// Evaluate and regulate against `readings`; returns the report and
    /// the LED signal for the caller to forward.
    pub fn step(
        &mut self,
        state: &EngineState,
        now_ms: u64,
        readings: PressureSnapshot,
    ) -> (TickReport, BehaviorOutput) {
        let output = self.evaluate(state, now_ms);
        let report = TickReport {
            base: regulate(&mut self.base, output.base_level, readings.base),
            leaves: regulate(&mut self.leaves, output.leaves_level, readings.leaves),
        };
        (report, output)
    }

    /// Full tick against the hardware ports.
    pub fn run(
        &mut self,
        state: &EngineState,
        now_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        led: &mut impl LedPort,
    ) -> TickReport {
        let readings = hw.read_pressures();
        let (report, output) = self.step(state, now_ms, readings);

        hw.actuate(ChannelId::Base, report.base.actuation);
        hw.actuate(ChannelId::Leaves, report.leaves.actuation);
        led.render(&output.visual);

        report
    }

    pub fn channel_state(&self, channel: ChannelId) -> ChannelState {
        match channel {
            ChannelId::Base => self.base.state(),
            ChannelId::Leaves => self.leaves.state(),
        }
    }
}

fn regulate(regulator: &mut PressureRegulator, level: f32, reading: u16) -> ChannelTelemetry {
    let actuation: Actuation = regulator.regulate(level, reading);
    ChannelTelemetry {
        level,
        target_pressure: regulator.target_pressure(level),
        reading,
        actuation,
    }
}
