//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::info;

use crate::app::events::{AppEvent, ChannelTelemetry};
use crate::app::ports::EventSink;
use crate::control::regulator::Actuation;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { mode, dwell_secs } => {
                info!("START | mode={} | dwell={:.1}s", mode, dwell_secs);
            }
            AppEvent::ModeEntered {
                from,
                to,
                dwell_secs,
                forced,
            } => {
                info!(
                    "MODE | {} -> {} | dwell={:.1}s{}",
                    from,
                    to,
                    dwell_secs,
                    if *forced { " | forced" } else { "" }
                );
            }
            AppEvent::Status(s) => {
                info!(
                    "STATUS | mode={} | left={:.1}s | auto={} | base {} | leaves {}",
                    s.mode,
                    s.remaining_ms as f32 / 1000.0,
                    if s.autonomous { "on" } else { "off" },
                    ChannelLine(&s.base),
                    ChannelLine(&s.leaves),
                );
            }
            AppEvent::AutonomyChanged(enabled) => {
                info!("MODE | autonomy {}", if *enabled { "on" } else { "off" });
            }
        }
    }
}

/// `lvl=0.42 tgt=57.8 p=55 pump=0 valve=0`
struct ChannelLine<'a>(&'a ChannelTelemetry);

impl core::fmt::Display for ChannelLine<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let t = self.0;
        let (pump, valve) = t.actuation.duties();
        write!(
            f,
            "lvl={:.2} tgt={:.1} p={} pump={} valve={}{}",
            t.level,
            t.target_pressure,
            t.reading,
            pump,
            valve,
            if t.actuation == Actuation::Hold { " (hold)" } else { "" }
        )
    }
}
