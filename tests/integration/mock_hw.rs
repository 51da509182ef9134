//! Mock adapters for integration tests.
//!
//! Records every actuator call, LED frame and event so tests can assert
//! on the full history without touching real ADC/PWM/RMT peripherals.

use softbloom::app::events::AppEvent;
use softbloom::app::ports::{ActuatorPort, EventSink, LedPort, SensorPort, UniformSource};
use softbloom::control::regulator::Actuation;
use softbloom::fsm::behaviors::VisualSignal;
use softbloom::fsm::context::{ChannelId, PressureSnapshot};

// ── MockHardware ──────────────────────────────────────────────

/// Fixed readings, recorded actuations.
pub struct MockHardware {
    pub readings: PressureSnapshot,
    pub calls: Vec<(ChannelId, Actuation)>,
    pub all_off_count: u32,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            readings: PressureSnapshot { base: 20, leaves: 20 },
            calls: Vec::new(),
            all_off_count: 0,
        }
    }

    pub fn last(&self, channel: ChannelId) -> Option<Actuation> {
        self.calls
            .iter()
            .rev()
            .find(|(c, _)| *c == channel)
            .map(|(_, a)| *a)
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_pressures(&mut self) -> PressureSnapshot {
        self.readings
    }
}

impl ActuatorPort for MockHardware {
    fn actuate(&mut self, channel: ChannelId, actuation: Actuation) {
        self.calls.push((channel, actuation));
    }

    fn all_off(&mut self) {
        self.all_off_count += 1;
    }
}

// ── PlantHardware ─────────────────────────────────────────────

/// First-order pneumatic plant: full pump duty adds `gain` sensor units
/// per tick, full valve duty removes the same.
pub struct PlantHardware {
    pub pressure: [f32; ChannelId::COUNT],
    pub gain: f32,
}

impl PlantHardware {
    pub fn new(start: f32, gain: f32) -> Self {
        Self {
            pressure: [start; ChannelId::COUNT],
            gain,
        }
    }
}

impl SensorPort for PlantHardware {
    fn read_pressures(&mut self) -> PressureSnapshot {
        let unit = |p: f32| p.round().clamp(0.0, 1023.0) as u16;
        PressureSnapshot {
            base: unit(self.pressure[0]),
            leaves: unit(self.pressure[1]),
        }
    }
}

impl ActuatorPort for PlantHardware {
    fn actuate(&mut self, channel: ChannelId, actuation: Actuation) {
        let (pump, valve) = actuation.duties();
        let delta = (f32::from(pump) - f32::from(valve)) / 255.0 * self.gain;
        let p = &mut self.pressure[channel as usize];
        *p = (*p + delta).max(0.0);
    }

    fn all_off(&mut self) {}
}

// ── MockLed ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MockLed {
    pub frames: Vec<VisualSignal>,
}

impl LedPort for MockLed {
    fn render(&mut self, signal: &VisualSignal) {
        self.frames.push(signal.clone());
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn mode_entries(&self) -> Vec<&AppEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::ModeEntered { .. }))
            .collect()
    }

    pub fn status_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Status(_)))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── ScriptedRng ───────────────────────────────────────────────

/// Replays fixed draws, then repeats the last one.
pub struct ScriptedRng {
    draws: Vec<f32>,
    pos: usize,
}

impl ScriptedRng {
    pub fn new(draws: &[f32]) -> Self {
        assert!(!draws.is_empty());
        Self { draws: draws.to_vec(), pos: 0 }
    }
}

impl UniformSource for ScriptedRng {
    fn next_unit(&mut self) -> f32 {
        let r = self.draws[self.pos.min(self.draws.len() - 1)];
        self.pos += 1;
        r
    }
}
