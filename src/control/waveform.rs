//! Periodic waveform generators.
//!
//! Every function maps `(t_ms, period_ms, shape)` to a normalized value.
//! They hold no state, so calling twice with the same arguments always
//! yields the same output and a behavior can be restarted at any time.
//!
//! Time is the widened `u64` millisecond clock (see
//! [`TickClock`](crate::app::clock::TickClock)).  Phase is derived with
//! `t % period` on unsigned time, so it stays continuous for the whole
//! lifetime of the process.
//!
//! ```text
//!  triangle   /\    /\        sine   ~~      ~~
//!            /  \  /  \            ~~  ~~  ~~
//!           /    \/    \               ~~
//!
//!  square   ▔▔▔|___|▔▔▔|___   pulse  ^   ^   ^   ^
//!                                    _/\__/\__/\__/\_
//! ```

use core::f32::consts::TAU;

/// Shortest period any generator will use.
pub const MIN_PERIOD_MS: u64 = 10;

/// Exponent applied to `|sin|` by [`pulse`].
pub const HEARTBEAT_EXPONENT: i32 = 4;

/// Clamp a period to [`MIN_PERIOD_MS`].
#[inline]
pub fn clamp_period(period_ms: u64) -> u64 {
    period_ms.max(MIN_PERIOD_MS)
}

/// Fractional position inside the current period, in `[0, 1)`.
pub fn phase(t_ms: u64, period_ms: u64) -> f32 {
    let period = clamp_period(period_ms);
    (t_ms % period) as f32 / period as f32
}

/// Shift `t_ms` back by `delay_ms` without ever underflowing.
///
/// The result has the same phase as `t_ms - delay_ms` for the given
/// period, including at `t_ms < delay_ms`.
pub fn delayed(t_ms: u64, delay_ms: u64, period_ms: u64) -> u64 {
    let period = clamp_period(period_ms);
    t_ms.wrapping_add(period - delay_ms % period)
}

/// Linear ramp `lo → hi` over the first half-period, `hi → lo` over the second.
pub fn triangle(t_ms: u64, period_ms: u64, lo: f32, hi: f32) -> f32 {
    let p = phase(t_ms, period_ms);
    let ramp = if p < 0.5 { 2.0 * p } else { 2.0 * (1.0 - p) };
    within(lo + (hi - lo) * ramp, lo, hi)
}

/// Sinusoid rescaled to `[lo, hi]`; mid-range at phase 0, rising.
pub fn sine(t_ms: u64, period_ms: u64, lo: f32, hi: f32) -> f32 {
    let s = (TAU * phase(t_ms, period_ms)).sin();
    within(lo + (hi - lo) * (0.5 + 0.5 * s), lo, hi)
}

/// 1.0 while the phase is below `duty`, otherwise 0.0.
pub fn square(t_ms: u64, period_ms: u64, duty: f32) -> f32 {
    let duty = if duty.is_nan() { 0.0 } else { duty.clamp(0.0, 1.0) };
    if phase(t_ms, period_ms) < duty { 1.0 } else { 0.0 }
}

/// Heartbeat: `|sin(2π·phase)|` raised to [`HEARTBEAT_EXPONENT`].
///
/// The exponent narrows each lobe into a short peak followed by a long
/// quiet stretch.
pub fn pulse(t_ms: u64, period_ms: u64) -> f32 {
    let s = (TAU * phase(t_ms, period_ms)).sin().abs();
    s.powi(HEARTBEAT_EXPONENT).clamp(0.0, 1.0)
}

fn within(value: f32, lo: f32, hi: f32) -> f32 {
    value.clamp(lo.min(hi), lo.max(hi))
}
