//! Control-loop primitives: waveform generators and the per-channel
//! pressure regulator.

pub mod regulator;
pub mod waveform;
