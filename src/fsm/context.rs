//! Mutable engine state and per-tick snapshots.
//!
//! `EngineState` is the single piece of process-wide mode state.  It is
//! owned by [`AppService`](crate::app::service::AppService) and lent by
//! reference to the mode machine (which mutates it) and the orchestrator
//! (which only reads it).  One execution context, so no locking.

use super::Mode;

// ---------------------------------------------------------------------------
// Engine state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineState {
    /// Active behavior.
    pub current_mode: Mode,
    /// Widened clock time (ms) at which the next transition is drawn.
    pub mode_deadline_ms: u64,
    /// Global time-scale multiplier (> 0).
    pub speed_factor: f32,
}

impl EngineState {
    /// Milliseconds until the next transition draw (0 once due).
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.mode_deadline_ms.saturating_sub(now_ms)
    }
}

// ---------------------------------------------------------------------------
// Channels and sensor snapshot
// ---------------------------------------------------------------------------

/// The two independent pressure channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChannelId {
    Base = 0,
    Leaves = 1,
}

impl ChannelId {
    pub const COUNT: usize = 2;
    pub const ALL: [Self; Self::COUNT] = [Self::Base, Self::Leaves];

    pub fn name(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Leaves => "leaves",
        }
    }
}

/// Raw pressure readings taken once at the top of a tick (sensor units).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PressureSnapshot {
    pub base: u16,
    pub leaves: u16,
}

impl PressureSnapshot {
    pub fn get(&self, channel: ChannelId) -> u16 {
        match channel {
            ChannelId::Base => self.base,
            ChannelId::Leaves => self.leaves,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_saturates_at_zero() {
        let s = EngineState {
            current_mode: Mode::Neutral,
            mode_deadline_ms: 5_000,
            speed_factor: 1.0,
        };
        assert_eq!(s.remaining_ms(1_000), 4_000);
        assert_eq!(s.remaining_ms(9_000), 0);
    }

    #[test]
    fn snapshot_lookup_by_channel() {
        let snap = PressureSnapshot { base: 300, leaves: 120 };
        assert_eq!(snap.get(ChannelId::Base), 300);
        assert_eq!(snap.get(ChannelId::Leaves), 120);
    }
}
