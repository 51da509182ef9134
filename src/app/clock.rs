//! Wrap-safe tick clock.
//!
//! Widens a raw `u32` millisecond counter into a `u64` that never steps
//! backwards.  Each reading adds `raw.wrapping_sub(last)` to the running
//! total, which is correct across the 2³² boundary as long as readings
//! are taken more often than every ~49 days.

#[derive(Debug, Clone, Copy, Default)]
pub struct TickClock {
    last_raw: Option<u32>,
    elapsed_ms: u64,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a raw reading into the widened time and return it.
    ///
    /// The first reading becomes the widened value as-is.
    pub fn observe(&mut self, raw_ms: u32) -> u64 {
        match self.last_raw {
            None => self.elapsed_ms = u64::from(raw_ms),
            Some(last) => self.elapsed_ms += u64::from(raw_ms.wrapping_sub(last)),
        }
        self.last_raw = Some(raw_ms);
        self.elapsed_ms
    }

    /// Last widened value.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }
}
