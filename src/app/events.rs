//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial, record in tests, etc.

use crate::control::regulator::Actuation;
use crate::fsm::Mode;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries the initial mode and its dwell).
    Started { mode: Mode, dwell_secs: f32 },

    /// A mode was entered, either by the mode machine or by command.
    ModeEntered {
        from: Mode,
        to: Mode,
        dwell_secs: f32,
        forced: bool,
    },

    /// Periodic status snapshot.
    Status(StatusSnapshot),

    /// Autonomous mode selection was switched on or off.
    AutonomyChanged(bool),
}

/// Point-in-time view of one pressure channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelTelemetry {
    pub level: f32,
    pub target_pressure: f32,
    pub reading: u16,
    pub actuation: Actuation,
}

/// A point-in-time snapshot suitable for logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusSnapshot {
    pub uptime_ms: u64,
    pub mode: Mode,
    pub remaining_ms: u64,
    pub autonomous: bool,
    pub base: ChannelTelemetry,
    pub leaves: ChannelTelemetry,
}
