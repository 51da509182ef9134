//! Stochastic mode state machine.
//!
//! Five emotion-coded modes.  Each mode dwells for a randomly drawn
//! duration; when the deadline passes the next mode is drawn from the
//! current mode's row of the transition matrix.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  every tick:   now >= deadline ?                         │
//! │                   │ no  → keep mode                      │
//! │                   │ yes → r₁ ~ U[0,1)  next = row[mode]  │
//! │                   │       r₂ ~ U[0,1)  dwell ∈ [lo,hi]/s │
//! │                   ▼       deadline = now + dwell         │
//! │      NEUTRAL ⇄ CALM ⇄ CURIOUS ⇄ ANGRY ⇄ SAD (any → any)  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The machine is continuous-time and non-blocking: `advance` is a
//! compare on the fast path and never suspends.  Self-transitions are
//! allowed and simply restart the dwell timer.

pub mod behaviors;
pub mod context;
pub mod transitions;

use core::fmt;
use core::str::FromStr;

use log::info;

use crate::app::ports::UniformSource;
use crate::config::SystemConfig;
use context::EngineState;
use transitions::{DwellRange, TransitionMatrix};

// ---------------------------------------------------------------------------
// Mode identity
// ---------------------------------------------------------------------------

/// The five behavior modes, ordered for matrix indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mode {
    Neutral = 0,
    Calm = 1,
    Curious = 2,
    Angry = 3,
    Sad = 4,
}

impl Mode {
    /// Total number of modes: sizes the matrix and behavior table.
    pub const COUNT: usize = 5;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Neutral,
        Self::Calm,
        Self::Curious,
        Self::Angry,
        Self::Sad,
    ];

    /// Convert an index back to `Mode`.  Panics on out-of-range in
    /// debug builds; returns `Neutral` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Neutral,
            1 => Self::Calm,
            2 => Self::Curious,
            3 => Self::Angry,
            4 => Self::Sad,
            _ => {
                debug_assert!(false, "invalid mode index: {idx}");
                Self::Neutral
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Neutral => "NEUTRAL",
            Self::Calm => "CALM",
            Self::Curious => "CURIOUS",
            Self::Angry => "ANGRY",
            Self::Sad => "SAD",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

// ---------------------------------------------------------------------------
// Transition record
// ---------------------------------------------------------------------------

/// A completed transition: which mode was left, which was entered, and
/// how long the new one will dwell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeEntry {
    pub from: Mode,
    pub to: Mode,
    pub dwell_ms: u64,
}

impl ModeEntry {
    pub fn dwell_secs(&self) -> f32 {
        self.dwell_ms as f32 / 1000.0
    }
}

// ---------------------------------------------------------------------------
// Mode machine
// ---------------------------------------------------------------------------

/// Holds the transition matrix and dwell table; the mutable part lives
/// in [`EngineState`], which the caller owns.
pub struct ModeMachine {
    transitions: TransitionMatrix,
    dwell: [DwellRange; Mode::COUNT],
}

impl ModeMachine {
    pub fn new(transitions: TransitionMatrix, dwell: [DwellRange; Mode::COUNT]) -> Self {
        Self { transitions, dwell }
    }

    pub fn from_config(config: &SystemConfig) -> Self {
        Self::new(TransitionMatrix::new(config.transitions), config.dwell)
    }

    /// Initial state: `Neutral` with a freshly drawn dwell.
    pub fn start(
        &self,
        now_ms: u64,
        speed_factor: f32,
        rng: &mut impl UniformSource,
    ) -> (EngineState, ModeEntry) {
        let mut state = EngineState {
            current_mode: Mode::Neutral,
            mode_deadline_ms: now_ms,
            speed_factor,
        };
        let entry = self.enter(&mut state, Mode::Neutral, now_ms, rng);
        info!(
            "Mode machine starting in {} for {:.1}s",
            entry.to,
            entry.dwell_secs()
        );
        (state, entry)
    }

    /// Check-and-advance.  Call once per tick with that tick's clock.
    ///
    /// Returns the transition taken, or `None` while the dwell runs.
    pub fn advance(
        &self,
        state: &mut EngineState,
        now_ms: u64,
        rng: &mut impl UniformSource,
    ) -> Option<ModeEntry> {
        if now_ms < state.mode_deadline_ms {
            return None;
        }
        let next = self.transitions.next_mode(state.current_mode, rng.next_unit());
        Some(self.enter(state, next, now_ms, rng))
    }

    /// Switch to `mode` immediately with a freshly drawn dwell.
    pub fn enter(
        &self,
        state: &mut EngineState,
        mode: Mode,
        now_ms: u64,
        rng: &mut impl UniformSource,
    ) -> ModeEntry {
        let dwell_ms = self.sample_dwell_ms(mode, state.speed_factor, rng.next_unit());
        let from = state.current_mode;
        state.current_mode = mode;
        state.mode_deadline_ms = now_ms.saturating_add(dwell_ms);
        ModeEntry { from, to: mode, dwell_ms }
    }

    /// Dwell for `mode` in seconds for draw `r`.
    pub fn sample_dwell_secs(&self, mode: Mode, speed_factor: f32, r: f32) -> f32 {
        self.dwell[mode as usize].sample_secs(speed_factor, r)
    }

    fn sample_dwell_ms(&self, mode: Mode, speed_factor: f32, r: f32) -> u64 {
        let secs = self.sample_dwell_secs(mode, speed_factor, r);
        (secs * 1000.0).round().max(0.0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed list of draws, repeating the last one.
    struct Scripted {
        draws: Vec<f32>,
        pos: usize,
    }

    impl Scripted {
        fn new(draws: &[f32]) -> Self {
            Self { draws: draws.to_vec(), pos: 0 }
        }
    }

    impl UniformSource for Scripted {
        fn next_unit(&mut self) -> f32 {
            let r = self.draws[self.pos.min(self.draws.len() - 1)];
            self.pos += 1;
            r
        }
    }

    fn machine() -> ModeMachine {
        ModeMachine::from_config(&SystemConfig::default())
    }

    #[test]
    fn starts_in_neutral_with_sampled_dwell() {
        let mut rng = Scripted::new(&[0.5]);
        let (state, entry) = machine().start(1_000, 1.0, &mut rng);
        assert_eq!(state.current_mode, Mode::Neutral);
        // NEUTRAL [8, 12] at r = 0.5 → 10 s
        assert_eq!(entry.dwell_ms, 10_000);
        assert_eq!(state.mode_deadline_ms, 11_000);
    }

    #[test]
    fn holds_until_deadline() {
        let m = machine();
        let mut rng = Scripted::new(&[0.0]);
        let (mut state, _) = m.start(0, 1.0, &mut rng);
        assert_eq!(state.mode_deadline_ms, 8_000);
        assert!(m.advance(&mut state, 7_999, &mut rng).is_none());
        assert_eq!(state.current_mode, Mode::Neutral);
    }

    #[test]
    fn advances_at_deadline() {
        let m = machine();
        // start dwell, then transition draw 0.45 (→ CALM), then dwell draw 0.0
        let mut rng = Scripted::new(&[0.0, 0.45, 0.0]);
        let (mut state, _) = m.start(0, 1.0, &mut rng);
        let entry = m.advance(&mut state, 8_000, &mut rng).unwrap();
        assert_eq!(entry.from, Mode::Neutral);
        assert_eq!(entry.to, Mode::Calm);
        assert_eq!(entry.dwell_ms, 10_000);
        assert_eq!(state.mode_deadline_ms, 18_000);
    }

    #[test]
    fn self_transition_restarts_dwell() {
        let m = machine();
        let mut rng = Scripted::new(&[0.0, 0.1, 1.0]);
        let (mut state, _) = m.start(0, 1.0, &mut rng);
        let entry = m.advance(&mut state, 9_000, &mut rng).unwrap();
        assert_eq!(entry.to, Mode::Neutral);
        assert_eq!(state.mode_deadline_ms, 9_000 + 12_000);
    }

    #[test]
    fn speed_factor_shortens_dwell() {
        let m = machine();
        for r in [0.0, 0.25, 0.5, 0.75, 0.999] {
            let secs = m.sample_dwell_secs(Mode::Angry, 2.0, r);
            assert!((5.0..=6.5).contains(&secs), "r={} secs={}", r, secs);
        }
    }

    #[test]
    fn enter_forces_mode() {
        let m = machine();
        let mut rng = Scripted::new(&[0.0]);
        let (mut state, _) = m.start(0, 1.0, &mut rng);
        let entry = m.enter(&mut state, Mode::Sad, 2_000, &mut rng);
        assert_eq!(entry.from, Mode::Neutral);
        assert_eq!(state.current_mode, Mode::Sad);
        assert_eq!(state.mode_deadline_ms, 2_000 + 12_000);
    }

    #[test]
    fn mode_index_roundtrip() {
        for i in 0..Mode::COUNT {
            assert_eq!(Mode::from_index(i) as usize, i);
        }
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("calm".parse::<Mode>(), Ok(Mode::Calm));
        assert_eq!(" Angry ".parse::<Mode>(), Ok(Mode::Angry));
        assert!("happy".parse::<Mode>().is_err());
    }
}
