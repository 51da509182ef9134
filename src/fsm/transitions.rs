//! Transition matrix, dwell ranges and the two samplers built on them.
//!
//! Both samplers take the uniform draw `r ∈ [0, 1)` as an argument rather
//! than owning a random source, so their boundaries can be checked with
//! exact inputs.

use serde::{Deserialize, Serialize};

use super::Mode;

/// Accepted deviation of a matrix row sum from 1.0.
pub const ROW_SUM_TOLERANCE: f32 = 1e-3;

/// Per-mode `(lo, hi)` dwell bound in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DwellRange {
    pub lo: f32,
    pub hi: f32,
}

impl DwellRange {
    pub const fn new(lo: f32, hi: f32) -> Self {
        Self { lo, hi }
    }

    /// `0 < lo <= hi`, both finite.
    pub fn is_valid(&self) -> bool {
        self.lo.is_finite() && self.hi.is_finite() && self.lo > 0.0 && self.lo <= self.hi
    }

    /// Uniform pick inside the range for draw `r`, scaled by `1 / speed_factor`.
    pub fn sample_secs(&self, speed_factor: f32, r: f32) -> f32 {
        let r = unit(r);
        (self.lo + (self.hi - self.lo) * r) / speed_factor
    }
}

/// Row-stochastic 5×5 table; row `i` holds `P(i → j)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    rows: [[f32; Mode::COUNT]; Mode::COUNT],
}

impl TransitionMatrix {
    pub fn new(rows: [[f32; Mode::COUNT]; Mode::COUNT]) -> Self {
        Self { rows }
    }

    pub fn row(&self, from: Mode) -> &[f32; Mode::COUNT] {
        &self.rows[from as usize]
    }

    /// Whether every row sums to 1 within [`ROW_SUM_TOLERANCE`].
    pub fn is_stochastic(&self) -> bool {
        self.rows
            .iter()
            .all(|row| (row.iter().sum::<f32>() - 1.0).abs() <= ROW_SUM_TOLERANCE)
    }

    /// Roulette-wheel pick of the mode that follows `from` for draw `r`.
    pub fn next_mode(&self, from: Mode, r: f32) -> Mode {
        roulette(self.row(from), r)
    }
}

/// Select the first entry whose cumulative probability reaches `r`.
///
/// Entries that are not strictly positive never win.  If the running sum
/// never reaches `r` (rounding, or a row that sums to less than one) the
/// last mode is returned, so the call is total over any input row.
pub fn roulette(row: &[f32; Mode::COUNT], r: f32) -> Mode {
    let mut cumulative = 0.0_f32;
    for (idx, p) in row.iter().enumerate() {
        if *p > 0.0 {
            cumulative += p;
            if cumulative >= r {
                return Mode::from_index(idx);
            }
        }
    }
    Mode::from_index(Mode::COUNT - 1)
}

fn unit(r: f32) -> f32 {
    if r.is_nan() { 0.0 } else { r.clamp(0.0, 1.0) }
}
