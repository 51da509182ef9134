//! Per-mode behavior functions and the table that keys them by [`Mode`].
//!
//! Each behavior is a plain `fn` pointer from elapsed time to two channel
//! levels plus a decorative LED signal.  No closures, no state: the
//! orchestrator looks up the row for the active mode and calls it.
//!
//! ```text
//!  Mode ──▶ BehaviorDescriptor.compute(t, speed) ──▶ (base, leaves, visual)
//! ```

use heapless::Vec;

use super::Mode;
use crate::control::waveform::{delayed, pulse, sine, square, triangle};
use crate::pins::LED_RING_PIXELS;

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

/// Frame request forwarded to the LED ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisualSignal {
    /// One colour on every pixel.
    Fill { colour: Rgb, brightness: u8 },
    /// Individual pixel colours plus a global brightness.
    Pixels {
        pixels: Vec<Rgb, LED_RING_PIXELS>,
        brightness: u8,
    },
}

/// Clock and time scale for one behavior evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorInput {
    pub t_ms: u64,
    pub speed_factor: f32,
}

impl BehaviorInput {
    /// A nominal duration rescaled by `1 / speed_factor`.
    pub fn scaled(&self, ms: u64) -> u64 {
        (ms as f32 / self.speed_factor) as u64
    }
}

/// Result of one behavior evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorOutput {
    pub base_level: f32,
    pub leaves_level: f32,
    pub visual: VisualSignal,
}

/// Signature of a behavior.
pub type BehaviorFn = fn(&BehaviorInput) -> BehaviorOutput;

/// One row of the behavior table.
pub struct BehaviorDescriptor {
    pub mode: Mode,
    pub compute: BehaviorFn,
}

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the behavior table, indexed by `Mode as usize`.
pub fn build_behavior_table() -> [BehaviorDescriptor; Mode::COUNT] {
    [
        BehaviorDescriptor { mode: Mode::Neutral, compute: neutral },
        BehaviorDescriptor { mode: Mode::Calm, compute: calm },
        BehaviorDescriptor { mode: Mode::Curious, compute: curious },
        BehaviorDescriptor { mode: Mode::Angry, compute: angry },
        BehaviorDescriptor { mode: Mode::Sad, compute: sad },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Behaviors
// ═══════════════════════════════════════════════════════════════════════════

pub const COLOUR_NEUTRAL: Rgb = (255, 180, 110); // warm white
pub const COLOUR_CALM: Rgb = (60, 120, 255); // soft blue
pub const COLOUR_CURIOUS: Rgb = (40, 255, 120); // green
pub const COLOUR_ANGRY: Rgb = (255, 0, 0); // red
pub const COLOUR_SAD: Rgb = (60, 0, 160); // indigo

/// Slow idle drift.
fn neutral(input: &BehaviorInput) -> BehaviorOutput {
    let t = input.t_ms;
    BehaviorOutput {
        base_level: triangle(t, input.scaled(6_000), 0.2, 0.5),
        leaves_level: sine(t, input.scaled(8_000), 0.2, 0.4),
        visual: VisualSignal::Fill {
            colour: COLOUR_NEUTRAL,
            brightness: sine(t, input.scaled(6_000), 30.0, 90.0) as u8,
        },
    }
}

/// Breathing: base and leaves on the same sine, leaves 500 ms behind.
fn calm(input: &BehaviorInput) -> BehaviorOutput {
    let t = input.t_ms;
    let period = input.scaled(4_000);
    let base_level = sine(t, period, 0.1, 0.85);
    BehaviorOutput {
        base_level,
        leaves_level: sine(delayed(t, input.scaled(500), period), period, 0.1, 0.55),
        visual: VisualSignal::Fill {
            colour: COLOUR_CALM,
            brightness: (base_level * 200.0) as u8,
        },
    }
}

/// Quick scanning movements with a comet running around the ring.
fn curious(input: &BehaviorInput) -> BehaviorOutput {
    let t = input.t_ms;
    BehaviorOutput {
        base_level: triangle(t, input.scaled(1_500), 0.3, 0.9),
        leaves_level: sine(t, input.scaled(1_000), 0.2, 0.7),
        visual: VisualSignal::Pixels {
            pixels: comet(t, input.scaled(2_000), COLOUR_CURIOUS),
            brightness: 140,
        },
    }
}

/// Hard on/off jolts with a heartbeat-driven red flash.
fn angry(input: &BehaviorInput) -> BehaviorOutput {
    let t = input.t_ms;
    let period = input.scaled(800);
    BehaviorOutput {
        base_level: 0.3 + 0.7 * square(t, period, 0.5),
        leaves_level: 0.2 + 0.6 * square(t, period, 0.3),
        visual: VisualSignal::Fill {
            colour: COLOUR_ANGRY,
            brightness: (pulse(t, input.scaled(1_000)) * 255.0) as u8,
        },
    }
}

/// Long, shallow, drooping swell.
fn sad(input: &BehaviorInput) -> BehaviorOutput {
    let t = input.t_ms;
    BehaviorOutput {
        base_level: sine(t, input.scaled(10_000), 0.05, 0.25),
        leaves_level: sine(t, input.scaled(12_000), 0.0, 0.15),
        visual: VisualSignal::Fill {
            colour: COLOUR_SAD,
            brightness: sine(t, input.scaled(10_000), 10.0, 40.0) as u8,
        },
    }
}

/// Head pixel at full colour with a four-pixel fading tail behind it.
fn comet(t_ms: u64, period_ms: u64, colour: Rgb) -> Vec<Rgb, LED_RING_PIXELS> {
    const TAIL: usize = 4;
    let head = (crate::control::waveform::phase(t_ms, period_ms) * LED_RING_PIXELS as f32) as usize
        % LED_RING_PIXELS;
    let (r, g, b) = colour;

    let mut pixels = Vec::new();
    for idx in 0..LED_RING_PIXELS {
        let behind = (head + LED_RING_PIXELS - idx) % LED_RING_PIXELS;
        let level = if behind < TAIL {
            (TAIL - behind) as u16 * 255 / TAIL as u16
        } else {
            0
        };
        let scale = |c: u8| ((u16::from(c) * level) / 255) as u8;
        // Capacity equals LED_RING_PIXELS, so the push cannot overflow.
        let _ = pixels.push((scale(r), scale(g), scale(b)));
    }
    pixels
}
